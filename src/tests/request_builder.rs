#[cfg(test)]
mod test {
    use crate::error::{ClientError, RequestValidationError, VALIDATION_PREAMBLE};
    use crate::request::RequestBuilder;
    use crate::tests::common::{favorite_band, hmac_options, json};
    use crate::tokens::{NestedToken, Sha1Options, SigningOptions, Token, TokenBase, TokenKind};
    use crate::utils::constants::CHAR_LIMIT;

    fn invalid_signing() -> SigningOptions {
        SigningOptions {
            algorithm: Some("ash1".into()),
            secret_name: None,
            string_to_sign: Some("mystring".into()),
            encoding: Some("lex".into()),
        }
    }

    #[test]
    fn builds_post_body_payload() {
        let builder = RequestBuilder::new(vec![
            favorite_band(),
            Token::replace_large(
                TokenBase::named("band").cache_override("flooding").skip_cache(true),
                "*".repeat(CHAR_LIMIT + 1),
            ),
            Token::secret(TokenBase::named("myApiKey").cache_override("xyz"), "watson"),
            Token::hmac(TokenBase::named("hmac_sig").cache_override("xyz"), hmac_options()),
            Token::rsa(TokenBase::named("rsa_sig").cache_override("xyz"), hmac_options()),
            Token::sha1(
                TokenBase::named("sha1_sig"),
                Sha1Options::new("my text", "hex")
                    .with_tokens(vec![NestedToken::secret("secureValue", "mySecretPath")]),
            ),
        ]);

        let payload = serde_json::to_value(builder.build().unwrap()).unwrap();

        let signing = json!({
            "algorithm": "sha1",
            "secretName": "watson",
            "stringToSign": "mystring",
            "encoding": "hex",
        });
        assert_eq!(
            payload,
            json!({
                "tokenApiVersion": "V1",
                "tokens": [
                    { "name": "FavoriteBand", "type": "replace", "cacheOverride": "Movable Band", "skipCache": false, "value": "Beatles" },
                    { "name": "band", "type": "replaceLarge", "cacheOverride": "flooding", "skipCache": true, "value": "*".repeat(CHAR_LIMIT + 1) },
                    { "name": "myApiKey", "type": "secret", "cacheOverride": "xyz", "skipCache": false, "path": "watson" },
                    { "name": "hmac_sig", "type": "hmac", "cacheOverride": "xyz", "skipCache": false, "options": signing.clone() },
                    { "name": "rsa_sig", "type": "rsa", "cacheOverride": "xyz", "skipCache": false, "options": signing.clone() },
                    {
                        "name": "sha1_sig", "type": "sha1", "cacheOverride": null, "skipCache": false,
                        "options": {
                            "text": "my text",
                            "encoding": "hex",
                            "tokens": [{ "name": "secureValue", "type": "secret", "path": "mySecretPath" }],
                        },
                    },
                ],
            })
        );
    }

    #[test]
    fn insertion_order_is_wire_order() {
        let mut builder = RequestBuilder::default();
        builder
            .push(Token::replace(TokenBase::named("second"), "2"))
            .push(Token::replace(TokenBase::named("first"), "1"));

        let body = builder.to_json().unwrap();
        assert!(body.starts_with(r#"{"tokenApiVersion":"V1","tokens":[{"name":"second""#));
        assert!(body.find("\"second\"").unwrap() < body.find("\"first\"").unwrap());
    }

    #[test]
    fn empty_builder_produces_empty_token_list() {
        let builder = RequestBuilder::default();
        assert_eq!(builder.to_json().unwrap(), r#"{"tokenApiVersion":"V1","tokens":[]}"#);
    }

    #[test]
    fn reports_every_invalid_token() {
        let builder = RequestBuilder::new(vec![
            Token::new(
                TokenBase::default().cache_override("Movable Band"),
                TokenKind::Replace { value: None },
            ),
            Token::replace_large(
                TokenBase::named("band").cache_override("flooding").skip_cache(true),
                "short string",
            ),
            Token::new(
                TokenBase::named("myApiKey").cache_override("xyz"),
                TokenKind::Secret { path: None },
            ),
            Token::hmac(TokenBase::default().cache_override("xyz"), invalid_signing()),
            Token::rsa(TokenBase::default().cache_override("xyz"), invalid_signing()),
            Token::sha1(
                TokenBase::named("sha1_sig"),
                Sha1Options::new("my text", "flex")
                    .with_tokens(vec![NestedToken::secret("secureValue", "")]),
            ),
        ]);

        let expected = [
            VALIDATION_PREAMBLE,
            "token 1: Missing properties for replace token: \"name, value\"",
            "token 2: ReplaceLarge token can only be used when value exceeds 100 character limit",
            "token 3: Missing properties for secret token: \"path\"",
            "token 4: Missing properties for hmac token: \"name\", HMAC algorithm is invalid, HMAC secret name not provided, HMAC encoding is invalid",
            "token 5: Missing properties for rsa token: \"name\", RSA algorithm is invalid, RSA secret name not provided, RSA encoding is invalid",
            "token 6: SHA1 encoding is invalid, Invalid secret token passed into SHA1 tokens array",
        ];

        let err = builder.build().unwrap_err();
        assert_eq!(err.lines.len(), 6);
        assert_eq!(err.to_string(), expected.join("\n"));
    }

    #[test]
    fn valid_tokens_do_not_rescue_an_invalid_request() {
        let builder = RequestBuilder::new(vec![
            favorite_band(),
            Token::hmac(
                TokenBase::named("hmac_sig"),
                SigningOptions {
                    algorithm: Some("invalid".into()),
                    secret_name: None,
                    string_to_sign: Some("mystring".into()),
                    encoding: Some("neo".into()),
                },
            ),
        ]);

        let err = builder.build().unwrap_err();
        assert_eq!(
            err,
            RequestValidationError::new(vec![
                "token 2: HMAC algorithm is invalid, HMAC secret name not provided, HMAC encoding is invalid"
                    .to_owned()
            ])
        );
    }

    #[test]
    fn to_json_surfaces_validation_error() {
        let builder = RequestBuilder::new(vec![Token::replace(TokenBase::default(), "x")]);

        match builder.to_json() {
            Err(ClientError::Validation(err)) => {
                assert_eq!(
                    err.lines,
                    ["token 1: Missing properties for replace token: \"name\""]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn every_error_line_is_prefixed_with_its_position() {
        let builder = RequestBuilder::new(vec![
            Token::secret(TokenBase::default(), "a"),
            favorite_band(),
            Token::secret(TokenBase::default(), "b"),
        ]);

        let err = builder.build().unwrap_err();
        let prefixes: Vec<&str> = err
            .lines
            .iter()
            .map(|line| line.split(':').next().unwrap())
            .collect();
        assert_eq!(prefixes, ["token 1", "token 3"]);
    }
}
