// Copyright 2025-present Scholar Search Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface over an [`Engine`] (§4.11): `GET /search`, `GET
//! /autocomplete`, and `POST /adddoc`, served with `warp` the way
//! meilisearch's `http-ui` exposes its own index over a handful of
//! narrowly scoped routes rather than a generic REST resource model.
//!
//! Every handler clones the `Engine` (an `Arc` underneath, so this is
//! cheap) into its filter closure rather than sharing a borrow, matching
//! the `index.clone()`-per-route pattern `http-ui` uses for its own index
//! handle.

use std::convert::Infallible;
use std::net::SocketAddr;

use log::{error, info};
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::{Filter, Reply};

use crate::engine::Engine;

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: String,
}

#[derive(Debug, Deserialize)]
struct AutocompleteQuery {
    q: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the full route tree for `engine`. Split out from [`serve`] so
/// tests can exercise routes without binding a socket.
pub fn routes(engine: Engine) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let search_engine = engine.clone();
    let search_route = warp::path("search")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .map(move |q: SearchQuery| {
            match search_engine.search(&q.q) {
                Ok(hits) => warp::reply::with_status(warp::reply::json(&hits), StatusCode::OK)
                    .into_response(),
                Err(e) => {
                    error!("search handler: {e}");
                    warp::reply::with_status(
                        warp::reply::json(&ErrorBody { error: e.to_string() }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response()
                }
            }
        });

    let autocomplete_engine = engine.clone();
    let autocomplete_route = warp::path("autocomplete")
        .and(warp::get())
        .and(warp::query::<AutocompleteQuery>())
        .map(move |q: AutocompleteQuery| {
            let suggestions = autocomplete_engine.suggest(&q.q);
            warp::reply::json(&suggestions)
        });

    let adddoc_engine = engine.clone();
    let adddoc_post_route = warp::path("adddoc")
        .and(warp::post())
        .and(warp::body::content_length_limit(1024 * 1024))
        .and(warp::body::json())
        .map(move |doc: serde_json::Value| match adddoc_engine.add_document(doc) {
            Ok(edid) => warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "id": edid })),
                StatusCode::CREATED,
            )
            .into_response(),
            Err(e) => {
                error!("adddoc handler: {e}");
                warp::reply::with_status(
                    warp::reply::json(&ErrorBody { error: e.to_string() }),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .into_response()
            }
        });

    // Browser clients issue a CORS preflight before the actual POST.
    let adddoc_options_route = warp::path("adddoc")
        .and(warp::options())
        .map(|| warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT));

    search_route
        .or(autocomplete_route)
        .or(adddoc_post_route)
        .or(adddoc_options_route)
        .with(warp::cors().allow_any_origin().allow_methods(vec!["GET", "POST", "OPTIONS"]))
}

/// Bind and serve `engine` over HTTP until the process is killed.
pub async fn serve(engine: Engine, addr: SocketAddr) {
    info!("listening on http://{addr}");
    warp::serve(routes(engine)).run(addr).await;
}
