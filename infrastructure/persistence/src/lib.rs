pub mod db;
pub mod subscriptions;
pub mod memory {
    pub mod repository;
}
pub mod shopping_list {
    pub mod entity;
    pub mod repository;
}
