pub mod admin;
pub mod catalog_query;
pub mod explore;
pub mod favorite;
pub mod home;
pub mod map_detail;
pub mod map_list;
pub mod splash;

pub use admin::AdminPage;
pub use explore::ExplorePage;
pub use favorite::FavoritePage;
pub use home::HomePage;
pub use map_detail::MapDetailPage;
pub use map_list::MapListPage;
pub use splash::SplashPage;
