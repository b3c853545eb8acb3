//! Torznab category definitions
//!
//! Standard Torznab categories follow the Newznab numbering scheme: main
//! categories are in thousands (2000, 5000, ...) and subcategories add
//! tens (5030, 5040, ...). Category codes are how searches are scoped,
//! so the built-in capability profiles and the query builder both speak
//! this table.

/// A standard Torznab category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TorznabCategory {
    pub id: i32,
    pub name: &'static str,
    pub parent_id: Option<i32>,
}

impl TorznabCategory {
    pub const fn new(id: i32, name: &'static str, parent_id: Option<i32>) -> Self {
        Self {
            id,
            name,
            parent_id,
        }
    }

    /// Check if this is a parent category
    pub fn is_parent(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Standard Torznab categories (based on the Newznab spec), limited to the
/// media blocks the aggregator serves.
pub static TORZNAB_CATEGORIES: &[TorznabCategory] = &[
    // Movies (2000)
    TorznabCategory::new(2000, "Movies", None),
    TorznabCategory::new(2010, "Movies/Foreign", Some(2000)),
    TorznabCategory::new(2020, "Movies/Other", Some(2000)),
    TorznabCategory::new(2030, "Movies/SD", Some(2000)),
    TorznabCategory::new(2040, "Movies/HD", Some(2000)),
    TorznabCategory::new(2045, "Movies/UHD", Some(2000)),
    TorznabCategory::new(2050, "Movies/BluRay", Some(2000)),
    TorznabCategory::new(2060, "Movies/3D", Some(2000)),
    // Audio (3000)
    TorznabCategory::new(3000, "Audio", None),
    TorznabCategory::new(3010, "Audio/MP3", Some(3000)),
    TorznabCategory::new(3030, "Audio/Audiobook", Some(3000)),
    TorznabCategory::new(3040, "Audio/Lossless", Some(3000)),
    // TV (5000)
    TorznabCategory::new(5000, "TV", None),
    TorznabCategory::new(5010, "TV/WEB-DL", Some(5000)),
    TorznabCategory::new(5020, "TV/Foreign", Some(5000)),
    TorznabCategory::new(5030, "TV/SD", Some(5000)),
    TorznabCategory::new(5040, "TV/HD", Some(5000)),
    TorznabCategory::new(5045, "TV/UHD", Some(5000)),
    TorznabCategory::new(5060, "TV/Sport", Some(5000)),
    TorznabCategory::new(5070, "TV/Anime", Some(5000)),
    TorznabCategory::new(5080, "TV/Documentary", Some(5000)),
    // XXX (6000)
    TorznabCategory::new(6000, "XXX", None),
    TorznabCategory::new(6010, "XXX/DVD", Some(6000)),
    TorznabCategory::new(6020, "XXX/WMV", Some(6000)),
    TorznabCategory::new(6030, "XXX/XviD", Some(6000)),
    TorznabCategory::new(6040, "XXX/x264", Some(6000)),
    TorznabCategory::new(6045, "XXX/UHD", Some(6000)),
    TorznabCategory::new(6050, "XXX/Pack", Some(6000)),
    TorznabCategory::new(6070, "XXX/Other", Some(6000)),
    TorznabCategory::new(6080, "XXX/SD", Some(6000)),
    TorznabCategory::new(6090, "XXX/WEB-DL", Some(6000)),
    // Books (7000)
    TorznabCategory::new(7000, "Books", None),
    TorznabCategory::new(7020, "Books/EBook", Some(7000)),
    TorznabCategory::new(7030, "Books/Comics", Some(7000)),
];

/// Common category constants for easy reference
pub mod cats {
    // Main categories
    pub const MOVIES: i32 = 2000;
    pub const AUDIO: i32 = 3000;
    pub const TV: i32 = 5000;
    pub const XXX: i32 = 6000;
    pub const BOOKS: i32 = 7000;

    // TV subcategories
    pub const TV_WEBDL: i32 = 5010;
    pub const TV_FOREIGN: i32 = 5020;
    pub const TV_SD: i32 = 5030;
    pub const TV_HD: i32 = 5040;
    pub const TV_UHD: i32 = 5045;
    pub const TV_SPORT: i32 = 5060;
    pub const TV_ANIME: i32 = 5070;
    pub const TV_DOCUMENTARY: i32 = 5080;

    // XXX subcategories
    pub const XXX_DVD: i32 = 6010;
    pub const XXX_WMV: i32 = 6020;
    pub const XXX_XVID: i32 = 6030;
    pub const XXX_X264: i32 = 6040;
    pub const XXX_UHD: i32 = 6045;
    pub const XXX_PACK: i32 = 6050;
    pub const XXX_OTHER: i32 = 6070;
    pub const XXX_SD: i32 = 6080;
    pub const XXX_WEBDL: i32 = 6090;
}

/// Get a category by ID
pub fn get_category(id: i32) -> Option<&'static TorznabCategory> {
    TORZNAB_CATEGORIES.iter().find(|c| c.id == id)
}

/// Get all subcategories for a parent category
pub fn get_subcategories(parent_id: i32) -> Vec<&'static TorznabCategory> {
    TORZNAB_CATEGORIES
        .iter()
        .filter(|c| c.parent_id == Some(parent_id))
        .collect()
}

/// Expand categories to include all subcategories.
/// E.g., [5000] -> [5000, 5010, 5020, 5030, 5040, 5045, 5060, 5070, 5080]
pub fn expand_categories(categories: &[i32]) -> Vec<i32> {
    let mut expanded = vec![];

    for &cat in categories {
        expanded.push(cat);

        for torznab_cat in TORZNAB_CATEGORIES {
            if torznab_cat.parent_id == Some(cat) {
                expanded.push(torznab_cat.id);
            }
        }
    }

    expanded.sort();
    expanded.dedup();
    expanded
}
