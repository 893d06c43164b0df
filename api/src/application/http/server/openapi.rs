use crate::application::http::{
    evidence::router::EvidenceApiDoc, label_analysis::router::LabelAnalysisApiDoc,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ingredient Co-Pilot API"
    ),
    nest(
        (path = "/labels", api = LabelAnalysisApiDoc),
        (path = "/evidence", api = EvidenceApiDoc),
    )
)]
pub struct ApiDoc;
