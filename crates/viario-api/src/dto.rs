use serde::{Deserialize, Serialize};
use viario_model::{classify, HighwaySection, Municipality, RoadSegment, RoadSegmentDetail};

fn or_empty(value: Option<String>) -> String {
    value.unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MunicipalityRow {
    pub id: i64,
    pub nome: String,
}

impl From<Municipality> for MunicipalityRow {
    fn from(m: Municipality) -> Self {
        Self {
            id: m.id,
            nome: m.name,
        }
    }
}

/// One ramal row in a listing, augmented with the classifier output.
/// Absent free-text columns surface as empty strings; `numero_contrato`
/// stays null unless the classifier echoes a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRow {
    pub id: i64,
    pub codigo: String,
    pub descricao: String,
    pub extensao_km: String,
    pub tem_obra: bool,
    pub numero_contrato: Option<String>,
    pub revestimento: String,
}

impl SegmentRow {
    #[must_use]
    pub fn from_record(segment: RoadSegment) -> Self {
        let classification = classify(segment.contract_number.as_deref(), segment.status.as_deref());
        Self {
            id: segment.id,
            codigo: or_empty(segment.code),
            descricao: or_empty(segment.description),
            extensao_km: or_empty(segment.extension_km),
            tem_obra: classification.has_construction,
            numero_contrato: classification.contract_number,
            revestimento: or_empty(segment.surface),
        }
    }
}

/// Full ramal detail, flattened the way the registry has always served it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDetail {
    pub id: i64,
    pub codigo: String,
    pub descricao: String,
    pub extensao_km: String,
    pub tem_obra: bool,
    pub numero_contrato: Option<String>,
    pub revestimento: String,
    pub classificacao: String,
    pub segmentacao: String,
    pub rodovia_acesso: String,
    pub ponto_referencia: String,
    pub local_inicio: String,
    pub local_termino: String,
    pub ano_conclusao: String,
    pub municipio_nome: String,
}

impl SegmentDetail {
    #[must_use]
    pub fn from_record(detail: RoadSegmentDetail) -> Self {
        let segment = detail.segment;
        let classification = classify(segment.contract_number.as_deref(), segment.status.as_deref());
        Self {
            id: segment.id,
            codigo: or_empty(segment.code),
            descricao: or_empty(segment.description),
            extensao_km: or_empty(segment.extension_km),
            tem_obra: classification.has_construction,
            numero_contrato: classification.contract_number,
            revestimento: or_empty(segment.surface),
            classificacao: or_empty(detail.road_class),
            segmentacao: or_empty(detail.segmentation),
            rodovia_acesso: or_empty(detail.access_highway),
            ponto_referencia: or_empty(detail.reference_point),
            local_inicio: or_empty(detail.start_location),
            local_termino: or_empty(detail.end_location),
            ano_conclusao: or_empty(detail.completion_year),
            municipio_nome: or_empty(detail.municipality_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighwayNameRow {
    pub rodovia: String,
}

/// One trecho in a highway detail response. Columns pass through as stored,
/// nulls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighwaySectionRow {
    pub id: i64,
    pub rodovia: Option<String>,
    pub codigo_ser_snv: Option<String>,
    pub extensao: Option<String>,
    pub regiao: Option<String>,
    pub sentido: Option<String>,
    pub jurisdicao: Option<String>,
    pub inicio: Option<String>,
    pub r#final: Option<String>,
    pub descricao: Option<String>,
    pub tipo_revestimento: Option<String>,
    pub faixa_dominio: Option<String>,
}

impl From<HighwaySection> for HighwaySectionRow {
    fn from(s: HighwaySection) -> Self {
        Self {
            id: s.id,
            rodovia: s.highway,
            codigo_ser_snv: s.snv_code,
            extensao: s.extension,
            regiao: s.region,
            sentido: s.direction,
            jurisdicao: s.jurisdiction,
            inicio: s.start,
            r#final: s.end,
            descricao: s.description,
            tipo_revestimento: s.surface_type,
            faixa_dominio: s.right_of_way,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighwayDetails {
    pub rodovia: String,
    pub extensao_total: String,
    pub total_trechos: usize,
    pub trechos: Vec<HighwaySectionRow>,
}

impl HighwayDetails {
    #[must_use]
    pub fn from_sections(name: String, sections: Vec<HighwaySection>) -> Self {
        let total = viario_model::total_extension_km(
            sections.iter().map(|s| s.extension.as_deref()),
        );
        Self {
            rodovia: name,
            extensao_total: viario_model::format_extension_total(total),
            total_trechos: sections.len(),
            trechos: sections.into_iter().map(HighwaySectionRow::from).collect(),
        }
    }
}
