#![allow(dead_code)]

use rust_openai::{ApiType, Client};

pub fn build_openai_client(base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .build()
        .unwrap()
}

pub fn build_openai_client_with_org(base_url: &str, org_id: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .base_url(base_url)
        .org_id(org_id)
        .build()
        .unwrap()
}

pub fn build_azure_client(api_type: ApiType, base_url: &str) -> Client {
    Client::builder()
        .api_key("test-key")
        .api_type(api_type)
        .base_url(base_url)
        .build()
        .unwrap()
}
