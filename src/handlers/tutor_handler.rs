use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::request::{
        AskRequest, MultipleApproachesRequest, NotesRequest, QuizRequest, SimplerRequest,
    },
};

#[post("/api/generate-notes")]
async fn generate_notes(
    state: web::Data<AppState>,
    request: web::Json<NotesRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.tutor_service.generate_notes(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/ask")]
async fn ask_question(
    state: web::Data<AppState>,
    request: web::Json<AskRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.tutor_service.ask(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/explain-simpler")]
async fn explain_simpler(
    state: web::Data<AppState>,
    request: web::Json<SimplerRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.tutor_service.explain_simpler(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/multiple-approaches")]
async fn multiple_approaches(
    state: web::Data<AppState>,
    request: web::Json<MultipleApproachesRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state
        .tutor_service
        .explain_multiple_ways(request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/generate-quiz")]
async fn generate_quiz(
    state: web::Data<AppState>,
    request: web::Json<QuizRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.tutor_service.generate_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
