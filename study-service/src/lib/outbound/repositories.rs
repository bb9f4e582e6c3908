pub mod memory;
pub mod plan;
pub mod user;

pub use memory::InMemoryPlanRepository;
pub use memory::InMemoryUserRepository;
pub use plan::PostgresPlanRepository;
pub use user::PostgresUserRepository;
