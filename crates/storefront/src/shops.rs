//! The static shop registry.
//!
//! Every vendor shop is one entry here: a public catalog path, a protected
//! admin path, and a flag for whether the shop manages product categories.
//! Both route registration and the post-login redirect mapping derive from
//! this table, so adding a shop is a one-line change rather than a new pair
//! of screens.

/// One vendor shop on the marketplace.
#[derive(Debug)]
pub struct Shop {
    /// Display name shown on public pages.
    pub name: &'static str,
    /// Directory filter label (e.g. "Boulangerie").
    pub kind: &'static str,
    /// Short description for the shop directory.
    pub blurb: &'static str,
    /// Public catalog path.
    pub public_path: &'static str,
    /// Protected admin panel path.
    pub admin_path: &'static str,
    /// Whether the admin panel manages product categories.
    pub categories: bool,
}

/// All shops on the marketplace.
pub static SHOPS: [Shop; 4] = [
    Shop {
        name: "La Boulangerie du Coin",
        kind: "Boulangerie",
        blurb: "Boulangerie artisanale avec des produits bio et faits maison.",
        public_path: "/boulangerie-publique",
        admin_path: "/ma-boulangerie",
        categories: true,
    },
    Shop {
        name: "My Cake",
        kind: "Pâtisserie",
        blurb: "Gâteau fait maison pour les occasions.",
        public_path: "/cake-publique",
        admin_path: "/my-cake",
        categories: true,
    },
    Shop {
        name: "Mes Savons",
        kind: "Bien-être",
        blurb: "Produits de bien-être et soins pour le corps 100% naturels.",
        public_path: "/savons-publique",
        admin_path: "/mes-savons",
        categories: false,
    },
    Shop {
        name: "La Périculture",
        kind: "Bébé",
        blurb: "Produits pour bébé, adaptés à votre bébé.",
        public_path: "/periculture-publique",
        admin_path: "/ma-periculture",
        categories: false,
    },
];

/// Protected landing page used when no better destination is known.
pub const DEFAULT_ADMIN_PATH: &str = "/ma-boulangerie";

/// Resolve where to send a vendor after a successful login.
///
/// A captured public catalog path maps to the matching admin panel; anything
/// else (including no captured path at all) falls back to the default
/// landing page.
#[must_use]
pub fn redirect_after_login(original_path: Option<&str>) -> &'static str {
    original_path
        .and_then(|path| SHOPS.iter().find(|shop| shop.public_path == path))
        .map_or(DEFAULT_ADMIN_PATH, |shop| shop.admin_path)
}
