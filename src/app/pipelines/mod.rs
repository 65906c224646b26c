pub mod tfa_pipeline;
