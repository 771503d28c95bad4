pub mod claims;
pub mod clock;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use errors::JwtError;
pub use handler::JwtHandler;
