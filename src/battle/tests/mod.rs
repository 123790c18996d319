pub mod common;



#[cfg(test)]
mod test_status_effects;



#[cfg(test)]
mod test_ai_battles;
