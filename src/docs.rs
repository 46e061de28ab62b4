use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::modules::video::handler::process_video),
    components(schemas(
        crate::modules::video::dto::ProcessVideoRequest,
        crate::modules::video::dto::ProcessVideoResponse,
    )),
    tags((name = "Video", description = "Raw video transcoding"))
)]
pub struct ApiDoc;
