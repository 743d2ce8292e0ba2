pub mod client;
pub mod delivery_address;
pub mod order;
pub mod order_item;

pub use client::Entity as Client;
pub use delivery_address::Entity as DeliveryAddress;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
