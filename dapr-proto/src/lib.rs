//! # Dapr Protos
//!
//! Generated bindings for the legacy Dapr gRPC surface used by the demos:
//!
//! * [`pb::dapr`]: the sidecar API (`InvokeService`, `PublishEvent`).
//! * [`pb::daprclient`]: the app callback API Dapr calls into.
//! * [`pb::daprexamples`]: the domain messages exchanged by the demo apps.
//!
//! Domain messages implement [`prost::Name`] so they can be packed into a
//! `google.protobuf.Any` with a proper type URL.

pub mod pb {
    pub mod dapr {
        include!(concat!(env!("OUT_DIR"), "/dapr.rs"));
    }

    pub mod daprclient {
        include!(concat!(env!("OUT_DIR"), "/daprclient.rs"));
    }

    pub mod daprexamples {
        include!(concat!(env!("OUT_DIR"), "/daprexamples.rs"));
    }
}

pub use pb::dapr::dapr_client::DaprClient as SidecarGrpcClient;
pub use pb::dapr::dapr_server::{Dapr, DaprServer};
pub use pb::daprclient::dapr_client_server::{
    DaprClient as AppCallback, DaprClientServer as AppCallbackServer,
};

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("descriptors");

/// Domain used in the type URL of packed payloads.
pub const TYPE_URL_PREFIX: &str = "type.googleapis.com";

macro_rules! impl_name {
    ($package:literal => $($ty:ident),+ $(,)?) => {
        $(
            impl prost::Name for $ty {
                const NAME: &'static str = stringify!($ty);
                const PACKAGE: &'static str = $package;

                fn type_url() -> String {
                    format!("{}/{}", TYPE_URL_PREFIX, Self::full_name())
                }
            }
        )+
    };
}

use pb::daprexamples::{
    AddProductRequest, AddProductResponse, CreateOrderRequest, CreateOrderResponse,
    GetShoppingCartResponse, SayRequest, SayResponse, StorageReduceData,
};

impl_name!("daprexamples" =>
    SayRequest,
    SayResponse,
    StorageReduceData,
    AddProductRequest,
    AddProductResponse,
    GetShoppingCartResponse,
    CreateOrderRequest,
    CreateOrderResponse,
);

#[cfg(test)]
mod tests {
    use super::FILE_DESCRIPTOR_SET;
    use super::pb::daprexamples::StorageReduceData;
    use prost::{Message, Name};

    #[test]
    fn domain_messages_carry_their_type_url() {
        assert_eq!(
            StorageReduceData::full_name(),
            "daprexamples.StorageReduceData"
        );
        assert_eq!(
            StorageReduceData::type_url(),
            "type.googleapis.com/daprexamples.StorageReduceData"
        );
    }

    #[test]
    fn descriptor_set_describes_both_services() {
        let set = prost_types::FileDescriptorSet::decode(FILE_DESCRIPTOR_SET).unwrap();

        let services: Vec<String> = set
            .file
            .iter()
            .flat_map(|file| {
                file.service
                    .iter()
                    .map(move |svc| format!("{}.{}", file.package(), svc.name()))
            })
            .collect();

        assert!(services.contains(&"dapr.Dapr".to_string()));
        assert!(services.contains(&"daprclient.DaprClient".to_string()));
    }
}
