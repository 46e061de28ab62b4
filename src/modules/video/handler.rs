use super::dto::{ProcessVideoRequest, ProcessVideoResponse};
use super::service::SUCCESS_MESSAGE;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::{error, warn};

/// Process a raw video
///
/// Downloads the raw object, transcodes it to 360p, uploads it to the
/// processed bucket as `processed-<fileName>` and removes the local copies.
///
/// Every response uses the `ApiResponse` envelope. Clients read `message`:
/// `Processing finished successfully.` on 200, `Bad Request: Missing : fileName`
/// (or `Invalid`) on 400, and `Internal Server Error: <cause>` on 500.
#[utoipa::path(
    post,
    path = "/process-video",
    request_body = ProcessVideoRequest,
    responses(
        (status = 200, description = "Video processed", body = ApiResponse<ProcessVideoResponse>),
        (status = 400, description = "Missing or invalid fileName"),
        (status = 500, description = "Download, transcode or upload failed")
    ),
    tag = "Video"
)]
pub async fn process_video(
    State(state): State<AppState>,
    payload: Result<Json<ProcessVideoRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection.body_text());
            return ApiError::bad_request(format!("Bad Request: {}", rejection.body_text()))
                .into_response();
        }
    };

    let file_name = match req.into_file_name() {
        Ok(file_name) => file_name,
        Err(e) => {
            warn!("{}", e);
            return ApiError::bad_request(e.to_string()).into_response();
        }
    };

    match state.videos.process(&file_name).await {
        Ok(video) => ApiSuccess(
            ApiResponse::success(
                ProcessVideoResponse {
                    file_name: video.file_name,
                    processed_file_name: video.processed_file_name,
                },
                SUCCESS_MESSAGE,
            ),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => {
            error!(file_name = %file_name, "An error has occurred: {}", e);
            ApiError::internal(e).into_response()
        }
    }
}
