mod detail;
pub use detail::Detail;

mod orders;
pub use orders::Orders;

mod not_found;
pub use not_found::NotFound;
