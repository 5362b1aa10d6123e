use crate::store::{RegistryBackend, StoreError};
use async_trait::async_trait;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use viario_model::{
    HighwaySection, Municipality, MunicipalityId, RoadSegment, RoadSegmentDetail, SegmentId,
};

/// Registry snapshot backed by a read-only SQLite file.
///
/// Connections are opened per query inside `spawn_blocking`; the file is a
/// published snapshot, so `query_only` keeps even a misbehaving statement
/// from writing.
pub struct SqliteRegistry {
    path: PathBuf,
}

impl SqliteRegistry {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_read_only(&path)?;
            op(&conn)
        })
        .await
        .map_err(|e| StoreError(e.to_string()))?
        .map_err(|e| StoreError(e.to_string()))
    }
}

fn open_read_only(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.execute_batch("PRAGMA query_only=ON; PRAGMA temp_store=MEMORY;")?;
    Ok(conn)
}

fn segment_from_row(row: &Row<'_>) -> Result<RoadSegment, rusqlite::Error> {
    Ok(RoadSegment {
        id: row.get("id")?,
        code: row.get("codigo")?,
        description: row.get("descricao")?,
        extension_km: row.get("extensao_km")?,
        contract_number: row.get("numero_ct_cv")?,
        status: row.get("situacao")?,
        surface: row.get("revestimento")?,
    })
}

fn section_from_row(row: &Row<'_>) -> Result<HighwaySection, rusqlite::Error> {
    Ok(HighwaySection {
        id: row.get("id")?,
        highway: row.get("rodovia")?,
        snv_code: row.get("codigo_ser_snv")?,
        extension: row.get("extensao")?,
        region: row.get("regiao")?,
        direction: row.get("sentido")?,
        jurisdiction: row.get("jurisdicao")?,
        start: row.get("inicio")?,
        end: row.get("final")?,
        description: row.get("descricao")?,
        surface_type: row.get("tipo_revestimento")?,
        right_of_way: row.get("faixa_dominio")?,
    })
}

#[async_trait]
impl RegistryBackend for SqliteRegistry {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| conn.query_row("SELECT 1", [], |_| Ok(())))
            .await
    }

    async fn municipalities(&self) -> Result<Vec<Municipality>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, nome FROM municipios ORDER BY nome")?;
            let rows = stmt.query_map([], |row| {
                Ok(Municipality {
                    id: row.get("id")?,
                    name: row.get("nome")?,
                })
            })?;
            rows.collect()
        })
        .await
    }

    async fn segments_by_municipality(
        &self,
        municipality: MunicipalityId,
    ) -> Result<Vec<RoadSegment>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, codigo, descricao, extensao_km, numero_ct_cv, situacao, revestimento
                 FROM ramais WHERE municipio_id = ?1 ORDER BY descricao",
            )?;
            let rows = stmt.query_map([municipality.as_i64()], segment_from_row)?;
            rows.collect()
        })
        .await
    }

    async fn segment_detail(
        &self,
        segment: SegmentId,
    ) -> Result<Option<RoadSegmentDetail>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT r.id, r.codigo, r.descricao, r.extensao_km, r.numero_ct_cv,
                        r.situacao, r.revestimento, r.classificacao, r.segmentacao,
                        r.rodovia_acesso, r.ponto_referencia, r.local_inicio,
                        r.local_termino, r.ano_conclusao, m.nome AS municipio_nome
                 FROM ramais r JOIN municipios m ON r.municipio_id = m.id
                 WHERE r.id = ?1",
                [segment.as_i64()],
                |row| {
                    Ok(RoadSegmentDetail {
                        segment: segment_from_row(row)?,
                        road_class: row.get("classificacao")?,
                        segmentation: row.get("segmentacao")?,
                        access_highway: row.get("rodovia_acesso")?,
                        reference_point: row.get("ponto_referencia")?,
                        start_location: row.get("local_inicio")?,
                        end_location: row.get("local_termino")?,
                        completion_year: row.get("ano_conclusao")?,
                        municipality_name: row.get("municipio_nome")?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    async fn highway_names(&self) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT DISTINCT rodovia FROM rodovias
                 WHERE rodovia IS NOT NULL AND rodovia != '' ORDER BY rodovia",
            )?;
            let rows = stmt.query_map([], |row| row.get("rodovia"))?;
            rows.collect()
        })
        .await
    }

    async fn highway_sections(&self, name: &str) -> Result<Vec<HighwaySection>, StoreError> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, rodovia, codigo_ser_snv, extensao, regiao, sentido,
                        jurisdicao, inicio, final, descricao, tipo_revestimento, faixa_dominio
                 FROM rodovias WHERE rodovia = ?1 ORDER BY codigo_ser_snv",
            )?;
            let rows = stmt.query_map([name], section_from_row)?;
            rows.collect()
        })
        .await
    }
}
