mod http_ocr_client;
mod http_office_extractor;
mod mock_clients;

pub use http_ocr_client::HttpOcrClient;
pub use http_office_extractor::HttpOfficeExtractor;
pub use mock_clients::{MockAutomationClient, MockOcrClient, MockOfficeExtractor};
