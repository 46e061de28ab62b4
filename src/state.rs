use crate::modules::video::service::VideoService;

#[derive(Clone)]
pub struct AppState {
    pub videos: VideoService,
}

impl AppState {
    pub fn new(videos: VideoService) -> Self {
        Self { videos }
    }
}
