pub mod ai;
pub mod calculators;
pub mod commands;
pub mod conditions;
pub mod engine;
pub mod state;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
