pub mod agents;
pub mod aggregator;
pub mod context;
pub mod keywords;
pub mod ledger;
pub mod orchestrator;
pub mod reflection;
pub mod validator;

use crate::research::context::ResearchContext;
use crate::research::orchestrator::ResearchOrchestrator;
use crate::types::entity::EntityInput;
use crate::types::state::ResearchState;

/// 执行一次调研，返回终态的调研状态
pub async fn execute(context: &ResearchContext, input: &EntityInput) -> ResearchState {
    ResearchOrchestrator.execute(context, input).await
}
