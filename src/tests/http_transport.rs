#[cfg(test)]
mod test {
    use std::time::Duration;

    use anyhow::Result;
    use httpmock::prelude::*;
    use serde_json::Value;

    use crate::config::settings::{ClientConfig, RetryConfig};
    use crate::error::ClientError;
    use crate::hash::hash_string;
    use crate::request::{RequestBuilder, RequestOptions};
    use crate::sources::DataSource;
    use crate::tests::common::{favorite_band, json, params};
    use crate::tokens::{Token, TokenBase};

    fn config_for(server: &MockServer) -> ClientConfig {
        let mut config = ClientConfig::new("abc");
        config.base_url = server.url("/data_sources");
        config
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn lookup_reaches_the_data_source() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data_sources/abc")
                    .query_param("zip", "10001")
                    .query_param("band", "Movable Band")
                    .header("x-reverse-proxy-ttl", "10")
                    .header_exists("x-mi-cbe");
                then.status(200).body("Level,Tier\n1,Silver");
            })
            .await;

        let source = DataSource::from_config(&config_for(&server))?;
        let response = source
            .get_raw_data(
                &params(json!({ "zip": "10001", "band": "Movable Band" })),
                RequestOptions::get(),
            )
            .await?;

        assert_eq!(response.data, "Level,Tier\n1,Silver");
        mock.assert_calls_async(1).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn token_payload_is_posted_with_its_cache_key() -> Result<()> {
        let server = MockServer::start_async().await;
        let config = config_for(&server);
        let builder = RequestBuilder::new(vec![favorite_band()]);
        let expected_key = hash_string(&format!(
            r#"{}/abc[{{"FavoriteBand":"Movable Band"}}]"#,
            config.base_url
        ));

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/data_sources/abc")
                    .header("content-type", "application/json")
                    .header("x-mi-cbe", &expected_key)
                    .body(builder.to_json().unwrap());
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({ "FavoriteBand": "Beatles" }));
            })
            .await;

        let source = DataSource::from_config(&config)?;
        let response = source.get_with_tokens(&builder, RequestOptions::get()).await?;

        assert_eq!(response.json::<Value>()?, json!({ "FavoriteBand": "Beatles" }));
        mock.assert_calls_async(1).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn invalid_tokens_send_nothing() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let source = DataSource::from_config(&config_for(&server))?;
        let builder = RequestBuilder::new(vec![Token::secret(TokenBase::default(), "watson")]);
        let result = source.get_with_tokens(&builder, RequestOptions::get()).await;

        assert!(matches!(result, Err(ClientError::Validation(_))));
        mock.assert_calls_async(0).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn client_errors_are_not_retried() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/data_sources/abc");
                then.status(404).body("missing");
            })
            .await;

        let mut config = config_for(&server);
        config.retry = Some(RetryConfig {
            attempts: Some(3),
            base_delay_ms: Some(1),
            max_delay_ms: Some(5),
        });

        let source = DataSource::from_config(&config)?;
        let result = source.get_raw_data(&params(json!({})), RequestOptions::get()).await;

        match result {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, 404);
                assert_eq!(body, "missing");
            }
            other => panic!("expected status error, got {:?}", other),
        }
        mock.assert_calls_async(1).await;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn slow_responses_time_out() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/data_sources/abc");
                then.status(200).delay(Duration::from_millis(500)).body("late");
            })
            .await;

        let mut config = config_for(&server);
        config.timeout_ms = 50;
        config.retry = Some(RetryConfig {
            attempts: Some(2),
            base_delay_ms: Some(1),
            max_delay_ms: Some(1),
        });

        let source = DataSource::from_config(&config)?;
        let result = source.get_raw_data(&params(json!({})), RequestOptions::get()).await;

        match result {
            Err(ClientError::Http(e)) => assert!(e.is_timeout(), "unexpected error: {}", e),
            other => panic!("expected timeout, got {:?}", other),
        }
        mock.assert_calls_async(2).await;
        Ok(())
    }
}
