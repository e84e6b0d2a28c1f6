pub mod subnet_matcher_service;

pub use subnet_matcher_service::SubnetMatcherService;
