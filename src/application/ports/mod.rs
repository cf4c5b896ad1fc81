pub mod remote_gateway;

pub use remote_gateway::{GatewayError, NotificationSubscription, RemoteDataGateway};
