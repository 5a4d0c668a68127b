//! Protobuf types for the ledger's deployment module.
//!
//! Declared with `prost` derives in the same shape `prost-build` emits, under
//! a module hierarchy mirroring the protobuf packages. The schema is owned by
//! the ledger; field tags here must track it.

pub mod cosmos {
    pub mod base {
        pub mod query {
            pub mod v1beta1 {
                /// Cursor-based pagination request.
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct PageRequest {
                    #[prost(bytes = "vec", tag = "1")]
                    pub key: ::prost::alloc::vec::Vec<u8>,
                    #[prost(uint64, tag = "2")]
                    pub offset: u64,
                    #[prost(uint64, tag = "3")]
                    pub limit: u64,
                    #[prost(bool, tag = "4")]
                    pub count_total: bool,
                    #[prost(bool, tag = "5")]
                    pub reverse: bool,
                }

                /// Pagination metadata returned with a page of results.
                #[derive(Clone, PartialEq, ::prost::Message)]
                pub struct PageResponse {
                    #[prost(bytes = "vec", tag = "1")]
                    pub next_key: ::prost::alloc::vec::Vec<u8>,
                    #[prost(uint64, tag = "2")]
                    pub total: u64,
                }
            }
        }
    }
}

pub mod deployer {
    pub mod deployment {
        pub mod v1 {
            use super::super::super::cosmos::base::query::v1beta1::{PageRequest, PageResponse};

            pub const PACKAGE: &str = "deployer.deployment.v1";

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Meta {
                #[prost(string, tag = "1")]
                pub creator: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub name: ::prost::alloc::string::String,
                #[prost(string, tag = "3")]
                pub description: ::prost::alloc::string::String,
                #[prost(string, tag = "4")]
                pub domain: ::prost::alloc::string::String,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Payload {
                #[prost(enumeration = "ArchiveType", tag = "1")]
                pub archive_type: i32,
                #[prost(bytes = "vec", tag = "2")]
                pub content: ::prost::alloc::vec::Vec<u8>,
            }

            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum ArchiveType {
                Unspecified = 0,
                Zip = 1,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgCreateDeployment {
                #[prost(message, optional, tag = "1")]
                pub meta: ::core::option::Option<Meta>,
                #[prost(message, optional, tag = "2")]
                pub payload: ::core::option::Option<Payload>,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgUpdateDeployment {
                #[prost(message, optional, tag = "1")]
                pub meta: ::core::option::Option<Meta>,
                #[prost(message, optional, tag = "2")]
                pub payload: ::core::option::Option<Payload>,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct MsgRemoveDeployment {
                #[prost(string, tag = "1")]
                pub creator: ::prost::alloc::string::String,
                #[prost(string, tag = "2")]
                pub name: ::prost::alloc::string::String,
            }

            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum FilterField {
                Unspecified = 0,
                Creator = 1,
            }

            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
            #[repr(i32)]
            pub enum FilterOperator {
                Unspecified = 0,
                Equal = 1,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct Filter {
                #[prost(enumeration = "FilterField", tag = "1")]
                pub field: i32,
                #[prost(enumeration = "FilterOperator", tag = "2")]
                pub operator: i32,
                #[prost(string, tag = "3")]
                pub value: ::prost::alloc::string::String,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct QueryMetasRequest {
                #[prost(message, repeated, tag = "1")]
                pub filters: ::prost::alloc::vec::Vec<Filter>,
                #[prost(message, optional, tag = "2")]
                pub pagination: ::core::option::Option<PageRequest>,
            }

            #[derive(Clone, PartialEq, ::prost::Message)]
            pub struct QueryMetasResponse {
                #[prost(message, repeated, tag = "1")]
                pub metas: ::prost::alloc::vec::Vec<Meta>,
                #[prost(message, optional, tag = "2")]
                pub pagination: ::core::option::Option<PageResponse>,
            }

            /// gRPC method path for the metas query.
            pub const QUERY_METAS_PATH: &str = "/deployer.deployment.v1.Query/Metas";

            macro_rules! impl_name {
                ($($ty:ident),* $(,)?) => {
                    $(
                        impl ::prost::Name for $ty {
                            const NAME: &'static str = stringify!($ty);
                            const PACKAGE: &'static str = PACKAGE;
                        }
                    )*
                };
            }

            impl_name!(
                Meta,
                Payload,
                MsgCreateDeployment,
                MsgUpdateDeployment,
                MsgRemoveDeployment,
                Filter,
                QueryMetasRequest,
                QueryMetasResponse,
            );
        }
    }
}
