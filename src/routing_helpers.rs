use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;

/// Post/redirect/get: send the browser back to a page with a 303.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}
