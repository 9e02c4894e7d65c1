use actix_web::HttpResponse;
use serde::Serialize;

use crate::use_cases::listing::Page;

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        ApiResponse { success: true, data, pagination: None }
    }
}

impl<T: Serialize> From<Page<T>> for ApiResponse<Vec<T>> {
    fn from(page: Page<T>) -> Self {
        ApiResponse {
            success: true,
            data: page.items,
            pagination: Some(Pagination {
                total: page.total,
                limit: page.limit,
                offset: page.offset,
            }),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(data))
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::new(data))
}

pub fn paged<T: Serialize>(page: Page<T>) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::from(page))
}

pub fn deleted() -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::new(serde_json::json!({ "deleted": true })))
}
