//! Query parameters and link building for paginated list endpoints.

use axum::http::Uri;
use foodgram_core::{PageLinks, PageRequest};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::config::Config;

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<i64>,
    /// Page size (defaults to the server's PAGE_SIZE)
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn request(&self, config: &Config) -> PageRequest {
        PageRequest::new(self.page, self.limit, config.page_size)
    }
}

/// Next/previous links for a page of the endpoint at `uri`.
pub fn page_links(config: &Config, uri: &Uri, request: PageRequest, count: i64) -> PageLinks {
    let url = config.public_url(uri.path());
    PageLinks::build(request, count, &url, uri.query())
}
