//! Exchange collaborators - quote API clients and the Uniswap V4 quoter seam

pub mod api_clients;
pub mod uniswap_v4;
