pub mod ad_player;
pub mod bottom_nav;
pub mod category_glyph;
pub mod gate_screen;
pub mod map_card;
pub mod search_box;
pub mod status_toast;

pub use ad_player::AdPlayer;
pub use bottom_nav::BottomNav;
pub use category_glyph::CategoryGlyph;
pub use gate_screen::GateScreen;
pub use map_card::{MapRow, MapTile};
pub use search_box::SearchBox;
pub use status_toast::StatusToast;
