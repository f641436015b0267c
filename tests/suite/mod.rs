//! Integration suites.

mod game_flow;
mod gemini_client;
mod visual_pair;
