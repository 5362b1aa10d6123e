// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use viario_server::{build_router, AppState, SqliteRegistry};

fn seed_registry(db: &Path) {
    let conn = Connection::open(db).expect("open sqlite");
    conn.execute_batch(
        "CREATE TABLE municipios(id INTEGER PRIMARY KEY, nome TEXT);
         CREATE TABLE ramais(
             id INTEGER PRIMARY KEY, municipio_id INTEGER, codigo TEXT, descricao TEXT,
             extensao_km TEXT, numero_ct_cv TEXT, situacao TEXT, revestimento TEXT,
             classificacao TEXT, segmentacao TEXT, rodovia_acesso TEXT, ponto_referencia TEXT,
             local_inicio TEXT, local_termino TEXT, ano_conclusao TEXT);
         CREATE TABLE rodovias(
             id INTEGER PRIMARY KEY, rodovia TEXT, codigo_ser_snv TEXT, extensao TEXT,
             regiao TEXT, sentido TEXT, jurisdicao TEXT, inicio TEXT, final TEXT,
             descricao TEXT, tipo_revestimento TEXT, faixa_dominio TEXT);
         INSERT INTO municipios(id, nome) VALUES (1, 'Porto Velho'), (2, 'Ariquemes');
         INSERT INTO ramais(id, municipio_id, codigo, descricao, extensao_km, numero_ct_cv,
                            situacao, revestimento, classificacao, segmentacao, rodovia_acesso,
                            ponto_referencia, local_inicio, local_termino, ano_conclusao)
         VALUES
             (1, 1, 'RM-001', 'Ramal do Arrozal', '12,5 km', 'CT-2021/44', 'Concluído',
              'Primária', 'Vicinal', 'Trecho único', 'BR-364', 'km 17', 'Linha 101',
              'Rio Madeira', '2021'),
             (2, 1, 'RM-002', 'Ramal Boa Vista', NULL, NULL, 'A Visitar', NULL,
              NULL, NULL, NULL, NULL, NULL, NULL, NULL);
         INSERT INTO rodovias(id, rodovia, codigo_ser_snv, extensao, regiao, sentido,
                              jurisdicao, inicio, final, descricao, tipo_revestimento,
                              faixa_dominio)
         VALUES
             (1, 'BR-364', '364BRO0010', '10,5 km', 'Norte', 'Crescente', 'Federal',
              'Porto Velho', 'Candeias do Jamari', 'Trecho urbano', 'Pavimentado', '40m'),
             (2, 'BR-364', '364BRO0030', '4.5', 'Norte', 'Crescente', 'Federal',
              'Candeias do Jamari', 'Itapuã do Oeste', 'Trecho rural', 'Pavimentado', '40m');",
    )
    .expect("seed registry");
}

async fn spawn_server(state: AppState) -> SocketAddr {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("serve app")
    });
    addr
}

async fn sqlite_server() -> (SocketAddr, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = dir.path().join("registry.sqlite");
    seed_registry(&db);
    let state = AppState::new(Arc::new(SqliteRegistry::new(db)));
    let addr = spawn_server(state).await;
    (addr, dir)
}

async fn send_raw(addr: SocketAddr, request: String) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    send_raw(
        addr,
        format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n"),
    )
    .await
}

async fn get_with_user_agent(addr: SocketAddr, path: &str, agent: &str) -> (u16, String, String) {
    send_raw(
        addr,
        format!(
            "GET {path} HTTP/1.1\r\nHost: {addr}\r\nUser-Agent: {agent}\r\nConnection: close\r\n\r\n"
        ),
    )
    .await
}

async fn post_json(addr: SocketAddr, path: &str, body: &str) -> (u16, String, String) {
    send_raw(
        addr,
        format!(
            "POST {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
    )
    .await
}

async fn post_without_content_type(addr: SocketAddr, path: &str, body: &str) -> (u16, String, String) {
    send_raw(
        addr,
        format!(
            "POST {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
    )
    .await
}

fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        if k.trim().eq_ignore_ascii_case(name) {
            Some(v.trim())
        } else {
            None
        }
    })
}

#[tokio::test]
async fn golden_data_endpoints_return_stable_json_shapes() {
    let (addr, _dir) = sqlite_server().await;

    let (status, head, body) = get(addr, "/api/municipios").await;
    assert_eq!(status, 200);
    assert!(header_value(&head, "x-request-id").is_some());
    let municipios: serde_json::Value = serde_json::from_str(&body).expect("municipios json");
    let rows = municipios.as_array().expect("municipios array");
    assert_eq!(rows.len(), 2);
    // ORDER BY nome: Ariquemes first.
    assert_eq!(rows[0]["nome"], "Ariquemes");
    assert_eq!(rows[1]["id"], 1);

    let (status, _, body) = get(addr, "/api/ramais/1").await;
    assert_eq!(status, 200);
    let ramais: serde_json::Value = serde_json::from_str(&body).expect("ramais json");
    let rows = ramais.as_array().expect("ramais array");
    assert_eq!(rows.len(), 2);
    let arrozal = rows
        .iter()
        .find(|r| r["id"] == 1)
        .expect("seeded ramal present");
    assert_eq!(arrozal["codigo"], "RM-001");
    assert_eq!(arrozal["extensao_km"], "12,5 km");
    assert_eq!(arrozal["tem_obra"], true);
    assert_eq!(arrozal["numero_contrato"], "CT-2021/44");
    let boa_vista = rows
        .iter()
        .find(|r| r["id"] == 2)
        .expect("seeded ramal present");
    assert_eq!(boa_vista["tem_obra"], false);
    assert_eq!(boa_vista["numero_contrato"], serde_json::Value::Null);
    // NULL columns surface as empty strings, never as nulls.
    assert_eq!(boa_vista["revestimento"], "");

    let (status, _, body) = get(addr, "/api/ramal/1").await;
    assert_eq!(status, 200);
    let detail: serde_json::Value = serde_json::from_str(&body).expect("ramal json");
    assert_eq!(detail["descricao"], "Ramal do Arrozal");
    assert_eq!(detail["tem_obra"], true);
    assert_eq!(detail["municipio_nome"], "Porto Velho");
    assert_eq!(detail["rodovia_acesso"], "BR-364");
    assert_eq!(detail["ano_conclusao"], "2021");

    let (status, _, body) = get(addr, "/api/rodovias").await;
    assert_eq!(status, 200);
    let rodovias: serde_json::Value = serde_json::from_str(&body).expect("rodovias json");
    assert_eq!(rodovias, serde_json::json!([{"rodovia": "BR-364"}]));

    let (status, _, body) = get(addr, "/api/rodovia/BR-364").await;
    assert_eq!(status, 200);
    let rodovia: serde_json::Value = serde_json::from_str(&body).expect("rodovia json");
    assert_eq!(rodovia["rodovia"], "BR-364");
    // 10,5 km + 4.5 with the decimal comma normalized.
    assert_eq!(rodovia["extensao_total"], "15.00 km");
    assert_eq!(rodovia["total_trechos"], 2);
    assert_eq!(rodovia["trechos"][0]["codigo_ser_snv"], "364BRO0010");
    assert_eq!(rodovia["trechos"][1]["final"], "Itapuã do Oeste");
}

#[tokio::test]
async fn invalid_and_missing_ids_map_to_400_and_404() {
    let (addr, _dir) = sqlite_server().await;

    let (status, _, body) = get(addr, "/api/ramais/0").await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "invalid_parameter");
    assert_eq!(err["error"]["details"]["parameter"], "municipio_id");

    let (status, _, body) = get(addr, "/api/ramal/999").await;
    assert_eq!(status, 404);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "not_found");

    // A highway that sanitizes to nothing is a bad parameter.
    let (status, _, body) = get(addr, "/api/rodovia/%22%27%3C%3E").await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "invalid_parameter");

    // An unknown but well-formed highway is an empty detail, not an error.
    let (status, _, body) = get(addr, "/api/rodovia/BR-999").await;
    assert_eq!(status, 200);
    let rodovia: serde_json::Value = serde_json::from_str(&body).expect("rodovia json");
    assert_eq!(rodovia["total_trechos"], 0);
    assert_eq!(rodovia["extensao_total"], "0.00 km");
}

#[tokio::test]
async fn security_headers_are_stamped_on_every_response() {
    let (addr, _dir) = sqlite_server().await;

    for path in ["/api/municipios", "/healthz", "/nao-existe"] {
        let (_, head, _) = get(addr, path).await;
        assert_eq!(
            header_value(&head, "x-content-type-options"),
            Some("nosniff"),
            "missing nosniff on {path}"
        );
        assert_eq!(header_value(&head, "x-frame-options"), Some("SAMEORIGIN"));
        assert!(header_value(&head, "strict-transport-security").is_some());
        assert!(header_value(&head, "content-security-policy").is_some());
    }

    let (status, _, body) = get(addr, "/nao-existe").await;
    assert_eq!(status, 404);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "not_found");
}

#[tokio::test]
async fn scanner_user_agents_are_refused() {
    let (addr, _dir) = sqlite_server().await;

    let (status, _, body) = get_with_user_agent(addr, "/api/municipios", "sqlmap/1.7").await;
    assert_eq!(status, 403);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "access_denied");

    // Matching is case-folded.
    let (status, _, _) = get_with_user_agent(addr, "/healthz", "Mozilla/5.0 Nikto").await;
    assert_eq!(status, 403);

    let (status, _, _) = get_with_user_agent(addr, "/api/municipios", "Mozilla/5.0").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn post_routes_require_json_and_accept_submissions() {
    let (addr, _dir) = sqlite_server().await;

    let (status, _, body) =
        post_without_content_type(addr, "/api/solicitacao", r#"{"nome":"x"}"#).await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"]["code"], "unsupported_media_type");

    let (status, _, body) = post_json(
        addr,
        "/api/solicitacao",
        r#"{"nome":"Maria","ramal":"RM-001"}"#,
    )
    .await;
    assert_eq!(status, 200);
    let ok: serde_json::Value = serde_json::from_str(&body).expect("success json");
    assert_eq!(ok["success"], true);
    assert_eq!(ok["message"], "Solicitação registrada com sucesso!");

    let (status, _, body) = post_json(
        addr,
        "/api/cadastro-ramal",
        r#"{"descricao":"Ramal novo","municipio_id":1}"#,
    )
    .await;
    assert_eq!(status, 200);
    let ok: serde_json::Value = serde_json::from_str(&body).expect("success json");
    assert_eq!(ok["message"], "Solicitação de cadastro registrada com sucesso!");

    // Empty or falsy payloads carry nothing to register.
    for payload in ["{}", "[]", "null", "false", "0", "\"\""] {
        let (status, _, body) = post_json(addr, "/api/solicitacao", payload).await;
        assert_eq!(status, 400, "payload {payload} was accepted");
        let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
        assert_eq!(err["error"]["code"], "invalid_parameter");
    }
}

#[tokio::test]
async fn healthz_and_metrics_report_service_state() {
    let (addr, _dir) = sqlite_server().await;

    let (status, _, body) = get(addr, "/healthz").await;
    assert_eq!(status, 200);
    let health: serde_json::Value = serde_json::from_str(&body).expect("health json");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["database"], "connected");

    let (status, _, _) = get(addr, "/api/municipios").await;
    assert_eq!(status, 200);

    let (status, head, body) = get(addr, "/metrics").await;
    assert_eq!(status, 200);
    assert_eq!(
        header_value(&head, "content-type"),
        Some("text/plain; charset=utf-8")
    );
    assert!(body.contains("viario_requests_total"));
    assert!(body.contains("route=\"/api/municipios\""));
}

#[tokio::test]
async fn healthz_reports_disconnected_when_the_snapshot_is_missing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(Arc::new(SqliteRegistry::new(dir.path().join("absent.sqlite"))));
    let addr = spawn_server(state).await;

    let (status, _, body) = get(addr, "/healthz").await;
    assert_eq!(status, 500);
    let health: serde_json::Value = serde_json::from_str(&body).expect("health json");
    assert_eq!(health["status"], "unhealthy");
    assert_eq!(health["database"], "disconnected");
}
