//! Placeholder page shell.
//!
//! Page rendering belongs to the frontend; the guard's pass-through
//! decisions land here so allowed requests get a well-formed response.

use axum::response::{Html, IntoResponse};

const PAGE_SHELL: &str = concat!(
    "<!doctype html>\n",
    "<html lang=\"en\">\n",
    "<head><meta charset=\"utf-8\"><title>EthioTravel</title></head>\n",
    "<body><div id=\"app\"></div></body>\n",
    "</html>\n",
);

pub async fn shell() -> impl IntoResponse {
    Html(PAGE_SHELL)
}
