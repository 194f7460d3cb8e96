// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{http::StatusCode, response::IntoResponse};
use cargolink_api::ApiError;
use serde_json::Value;

use super::helpers::body_json;
use crate::HttpError;

fn status_of(err: ApiError) -> StatusCode {
    HttpError::from(err).status
}

#[test]
fn test_api_errors_map_to_status_codes() {
    assert_eq!(
        status_of(ApiError::InvalidInput {
            field: String::from("weight"),
            message: String::from("must be positive"),
        }),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(status_of(ApiError::CodeMismatch), StatusCode::BAD_REQUEST);
    assert_eq!(
        status_of(ApiError::AuthenticationFailed {
            reason: String::from("expired"),
        }),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(status_of(ApiError::PendingApproval), StatusCode::FORBIDDEN);
    assert_eq!(status_of(ApiError::Rejected), StatusCode::FORBIDDEN);
    assert_eq!(
        status_of(ApiError::ResourceNotFound {
            resource_type: String::from("Shipment"),
            message: String::from("Shipment 7 does not exist"),
        }),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_of(ApiError::Conflict {
            message: String::from("already accepted"),
        }),
        StatusCode::CONFLICT
    );
}

#[tokio::test]
async fn test_internal_errors_hide_details() {
    let response = HttpError::from(ApiError::Internal {
        message: String::from("disk I/O error at /var/lib/cargolink.db"),
    })
    .into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = body_json(response).await;
    assert_eq!(body["message"], "Server error");
}
