#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod http;

pub(crate) use fixtures::{get_test_connection, insert_sample_transactions};
pub(crate) use http::{assert_content_type, body_text};
