//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<案件编号>，持有浏览器会话和完成日志)
//!     ↓
//! workflow::ProcessFlow (处理单个案件)
//!     ↓
//! services (能力层：登录 / 完成日志 / 调试现场)
//!     ↓
//! infrastructure (基础设施：BrowserDriver / 等待原语)
//! ```
//!
//! ## 设计原则
//!
//! 1. **串行**：一个浏览器会话，一次只处理一个案件
//! 2. **资源隔离**：只有编排层持有浏览器会话
//! 3. **向下依赖**：编排层 → workflow → services → infrastructure
//! 4. **不关浏览器**：任何退出路径都不关闭浏览器

pub mod batch_processor;

pub use batch_processor::{App, BatchContext, BatchProcessor, RunSummary};
