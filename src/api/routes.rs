pub mod gateway;
pub mod probe;

pub use gateway::routes as gateway_routes;
pub use probe::routes as probe_routes;
