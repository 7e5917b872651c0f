//! App Router

use salvo::Router;

use crate::{auth, cars, payments};

pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cars")
                .push(Router::with_path("reserved").get(cars::reserved::handler))
                .push(Router::with_path("rented").get(cars::rented::handler))
                .push(
                    Router::with_path("{car}")
                        .push(Router::with_path("book").post(cars::book::handler))
                        .push(Router::with_path("cancel").post(cars::cancel::handler))
                        .push(
                            Router::with_path("availability").patch(cars::availability::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("payments")
                .get(payments::index::handler)
                .push(Router::with_path("booking").post(payments::create::handler))
                .push(Router::with_path("{payment}/complete").patch(payments::complete::handler)),
        )
}
