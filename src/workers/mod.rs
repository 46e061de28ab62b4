pub mod video_queue;
