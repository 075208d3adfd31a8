//! Breadcrumb trail data and derivation

mod builder;
mod item;

pub use builder::{get_breadcrumb_items, path_component, TrailBuilder};
pub use item::{BreadcrumbItem, HOME_URL};
