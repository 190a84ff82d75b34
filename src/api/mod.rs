mod extract;
mod headers;
mod router;
mod routes_games;
mod routes_misc;
mod state;
pub mod types;

use axum::{
    extract::{FromRequestParts, Query, Request, State},
    http::{header, request::Parts, HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::dates::{self, DateRange};
use crate::error::AppError;
use crate::filter;
use crate::rawg::ListingRequest;
use crate::timefilter::{self, FilterState, Section, TimeFilter};
use extract::*;
use headers::*;
use routes_games::*;
use routes_misc::*;
use types::*;

pub use router::build_router;
pub use state::AppState;
