#![allow(missing_docs)]

pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod ledger;

pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::{assert_content_type, json_body};
pub(crate) use ledger::{add_transaction, seeded_connection};
