//! HTTP client for the external document and chart services.
use std::time::Duration;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error,
    report::{ChartSpec, ReportTable},
};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CHART_WIDTH: u32 = 800;
const CHART_HEIGHT: u32 = 600;
const CHART_FORMAT: &str = "png";

/// Where reports are sent.
///
/// Any service left unset makes the matching report fail with
/// [Error::UpstreamFailure].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportConfig {
    /// The URL of the service that writes spreadsheets.
    pub document_service_url: Option<String>,
    /// The folder the spreadsheets are written to.
    pub folder_id: Option<String>,
    /// The URL of the service that renders chart images.
    pub chart_service_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadTableRequest<'a> {
    folder_id: Option<&'a str>,
    filename: &'a str,
    headers: &'a [String],
    data: &'a [Vec<String>],
}

#[derive(Debug, Deserialize)]
struct UploadTableResponse {
    status: String,
    url: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct RenderChartRequest<'a> {
    chart: Value,
    width: u32,
    height: u32,
    format: &'a str,
    filename: &'a str,
}

#[derive(Debug, Deserialize)]
struct RenderChartResponse {
    success: bool,
    url: Option<String>,
    error: Option<String>,
}

/// Submits reports to the external services and returns the links to the results.
#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    config: ReportConfig,
}

impl ReportClient {
    /// Create a client for the services in `config`.
    ///
    /// # Errors
    /// Returns [Error::UpstreamFailure] if the HTTP client cannot be set up.
    pub fn new(config: ReportConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| {
                tracing::error!("could not build HTTP client: {error}");
                Error::UpstreamFailure(format!("client HTTP non disponibile: {error}"))
            })?;

        Ok(Self { http, config })
    }

    /// Write `table` as a spreadsheet and return its URL.
    ///
    /// # Errors
    /// Returns [Error::UpstreamFailure] if the service is not configured,
    /// cannot be reached, or reports an error.
    pub async fn upload_table(&self, table: &ReportTable) -> Result<String, Error> {
        let url = configured(&self.config.document_service_url, "document service")?;

        let request = UploadTableRequest {
            folder_id: self.config.folder_id.as_deref(),
            filename: &table.filename,
            headers: &table.headers,
            data: &table.rows,
        };

        let response: UploadTableResponse = self.post_json(url, &request).await?;

        match response {
            UploadTableResponse {
                status,
                url: Some(url),
                ..
            } if status == "success" => {
                tracing::info!("uploaded \"{}\" to {url}", table.filename);
                Ok(url)
            }
            UploadTableResponse { message, .. } => Err(upstream_error(
                message.unwrap_or_else(|| "Errore sconosciuto dal servizio documenti".to_owned()),
            )),
        }
    }

    /// Render `chart` as an image and return its URL.
    ///
    /// # Errors
    /// Returns [Error::UpstreamFailure] if the service is not configured,
    /// cannot be reached, or reports an error.
    pub async fn render_chart(&self, chart: &ChartSpec) -> Result<String, Error> {
        let url = configured(&self.config.chart_service_url, "chart service")?;

        let option: Value = serde_json::from_str(&chart.to_echarts().to_string()).map_err(|error| {
            tracing::error!("could not serialize chart: {error}");
            Error::UpstreamFailure("Impossibile generare il grafico".to_owned())
        })?;

        let request = RenderChartRequest {
            chart: option,
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
            format: CHART_FORMAT,
            filename: &chart.filename,
        };

        let response: RenderChartResponse = self.post_json(url, &request).await?;

        match response {
            RenderChartResponse {
                success: true,
                url: Some(url),
                ..
            } => {
                tracing::info!("rendered \"{}\" to {url}", chart.filename);
                Ok(url)
            }
            RenderChartResponse { error, .. } => Err(upstream_error(
                error.unwrap_or_else(|| "Errore sconosciuto dal servizio grafici".to_owned()),
            )),
        }
    }

    async fn post_json<Req: Serialize + Sync, Resp: DeserializeOwned>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Resp, Error> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|error| upstream_error(format!("Servizio non raggiungibile: {error}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| upstream_error(format!("Risposta non leggibile: {error}")))?;

        if !status.is_success() {
            return Err(upstream_error(format!(
                "Il servizio ha risposto {}: {text}",
                status.as_u16()
            )));
        }

        serde_json::from_str(&text)
            .map_err(|error| upstream_error(format!("Risposta non valida: {error}")))
    }
}

fn configured<'a>(url: &'a Option<String>, service: &str) -> Result<&'a str, Error> {
    url.as_deref()
        .filter(|url| !url.is_empty())
        .ok_or_else(|| upstream_error(format!("{service} not configured")))
}

fn upstream_error(message: String) -> Error {
    tracing::error!("report service failure: {message}");
    Error::UpstreamFailure(message)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    use crate::{
        Amount, Error,
        report::{ChartSpec, ReportClient, ReportConfig, ReportTable, chart::ChartPoint},
    };

    fn table() -> ReportTable {
        ReportTable {
            filename: "Report Sintetico 2026-02".to_owned(),
            headers: vec!["Categoria".to_owned(), "Tipo Movimento".to_owned(), "Totale".to_owned()],
            rows: vec![vec!["Utenze".to_owned(), "Uscita".to_owned(), "42.50".to_owned()]],
        }
    }

    fn chart() -> ChartSpec {
        ChartSpec {
            filename: "Grafico Spese 2026-02".to_owned(),
            title: "Spese per categoria".to_owned(),
            subtitle: "febbraio 2026".to_owned(),
            points: vec![ChartPoint {
                label: "Utenze".to_owned(),
                value: Amount::from_cents(4250),
                value_label: "42,50 €".to_owned(),
                color: "#2563eb",
            }],
        }
    }

    fn client_for(server: &MockServer) -> ReportClient {
        ReportClient::new(ReportConfig {
            document_service_url: Some(format!("{}/documents", server.uri())),
            folder_id: Some("folder-123".to_owned()),
            chart_service_url: Some(format!("{}/charts", server.uri())),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn uploads_table_and_returns_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "folderId": "folder-123",
                "filename": "Report Sintetico 2026-02",
                "headers": ["Categoria", "Tipo Movimento", "Totale"],
                "data": [["Utenze", "Uscita", "42.50"]],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "url": "https://docs.example.com/sheet/1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server).upload_table(&table()).await.unwrap();

        assert_eq!(url, "https://docs.example.com/sheet/1");
    }

    #[tokio::test]
    async fn surfaces_document_service_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "quota exceeded",
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).upload_table(&table()).await;

        assert_eq!(result, Err(Error::UpstreamFailure("quota exceeded".to_owned())));
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/documents"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let result = client_for(&server).upload_table(&table()).await;

        assert!(
            matches!(&result, Err(Error::UpstreamFailure(message)) if message.contains("502")),
            "got {result:?}"
        );
    }

    #[tokio::test]
    async fn renders_chart_and_returns_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/charts"))
            .and(body_partial_json(json!({
                "width": 800,
                "height": 600,
                "format": "png",
                "filename": "Grafico Spese 2026-02",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "url": "https://charts.example.com/1.png",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server).render_chart(&chart()).await.unwrap();

        assert_eq!(url, "https://charts.example.com/1.png");
    }

    #[tokio::test]
    async fn surfaces_chart_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/charts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "invalid chart",
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).render_chart(&chart()).await;

        assert_eq!(result, Err(Error::UpstreamFailure("invalid chart".to_owned())));
    }

    #[tokio::test]
    async fn missing_service_url_is_upstream_failure() {
        let client = ReportClient::new(ReportConfig::default()).unwrap();

        assert_eq!(
            client.upload_table(&table()).await,
            Err(Error::UpstreamFailure("document service not configured".to_owned()))
        );
        assert_eq!(
            client.render_chart(&chart()).await,
            Err(Error::UpstreamFailure("chart service not configured".to_owned()))
        );
    }
}
