mod health;
mod scrape;

pub use health::health_handler;
pub use scrape::{create_scrape_job, delete_job, get_history, get_job_results, get_job_status};
