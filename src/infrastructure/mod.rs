pub mod chrome_driver;
pub mod driver;
pub mod js_executor;
pub mod wait;

pub use chrome_driver::ChromeDriver;
pub use driver::{BrowserDriver, ElementState};
pub use js_executor::JsExecutor;
pub use wait::{wait_for_element, wait_for_url, wait_until, Wait};
