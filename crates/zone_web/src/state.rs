use zone_newsapi::NewsService;

pub struct AppState {
    pub service: NewsService,
}

impl AppState {
    pub fn new(service: NewsService) -> Self {
        Self { service }
    }
}
