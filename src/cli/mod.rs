pub mod orchestration;

pub use orchestration::{
    run_deploy, run_draft, run_status, run_tag, DeployWorkflowArgs, DraftWorkflowArgs,
    TagWorkflowArgs,
};
