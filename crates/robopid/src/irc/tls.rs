//! TLS for `--secure`, trusting the roots in a PEM bundle.

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, info};

use super::IrcError;

pub async fn connect(
    tcp: TcpStream,
    host: &str,
    ca_bundle: &Path,
) -> Result<TlsStream<TcpStream>, IrcError> {
    let config = load_client_config(ca_bundle).await?;
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| IrcError::InvalidServerName(host.to_string()))?;

    let stream = TlsConnector::from(config).connect(server_name, tcp).await?;
    info!("TLS established with {}", host);
    Ok(stream)
}

async fn load_client_config(ca_bundle: &Path) -> Result<Arc<ClientConfig>, IrcError> {
    let pem = tokio::fs::read(ca_bundle).await.map_err(|e| {
        IrcError::Tls(format!(
            "Failed to read CA bundle {}: {}",
            ca_bundle.display(),
            e
        ))
    })?;

    let certs = rustls_pemfile::certs(&mut BufReader::new(pem.as_slice()))
        .collect::<Result<Vec<_>, _>>()?;
    if certs.is_empty() {
        return Err(IrcError::Tls(format!(
            "No certificates found in {}",
            ca_bundle.display()
        )));
    }

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    debug!("Loaded {} root certificates ({} ignored)", added, ignored);

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_bundle() {
        let err = load_client_config(Path::new("/nonexistent/robopi-ca.pem"))
            .await
            .unwrap_err();
        assert!(matches!(err, IrcError::Tls(_)));
    }

    #[tokio::test]
    async fn test_bundle_without_certificates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();

        let err = load_client_config(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("No certificates"));
    }
}
