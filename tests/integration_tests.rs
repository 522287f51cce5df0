//! End-to-end tests: HTTP icons, directory delivery

use std::io::Cursor;
use std::sync::{Arc, Once};

use ogpcard::export::{DirectorySink, ExportController, MemorySink};
use ogpcard::icon::{IconResolver, IconSource};
use ogpcard::text::default_classifier;
use ogpcard::{CardConfig, CardRenderer, Locale};
use tiny_http::{Response, Server};

static INIT: Once = Once::new();

fn red_png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(64, 64, image::Rgba([230, 20, 20, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Start a test HTTP server serving one icon
fn start_icon_server() -> String {
    INIT.call_once(|| {
        let server = Server::http("127.0.0.1:18091").unwrap();
        std::thread::spawn(move || {
            let icon = red_png();
            for request in server.incoming_requests() {
                let path = request.url().to_string();
                let response = match path.as_str() {
                    "/red.png" => Response::from_data(icon.clone()).with_header(
                        "Content-Type: image/png"
                            .parse::<tiny_http::Header>()
                            .unwrap(),
                    ),
                    "/garbage.png" => Response::from_data(b"not an image".to_vec()),
                    _ => Response::from_data(b"Not Found".to_vec()).with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });
    });

    "http://127.0.0.1:18091".to_string()
}

fn http_renderer() -> Arc<CardRenderer> {
    let icons = IconResolver::new(ogpcard::icon::default_fetcher(std::time::Duration::from_secs(5)));
    Arc::new(CardRenderer::from_parts(None, icons, default_classifier(), Locale::En))
}

fn icon_center_pixel(renderer: &CardRenderer, config: &CardConfig, png_data: &[u8]) -> [u8; 4] {
    let layout = renderer.compose(config);
    let (rect, _) = layout.image().unwrap();
    let img = image::load_from_memory(png_data).unwrap().to_rgba8();
    img.get_pixel(
        (rect.x + rect.width / 2.0) as u32,
        (rect.y + rect.height / 2.0) as u32,
    )
    .0
}

#[cfg(feature = "http")]
#[tokio::test(flavor = "multi_thread")]
async fn remote_icon_is_drawn() {
    let base = start_icon_server();
    let renderer = http_renderer();
    let sink = Arc::new(MemorySink::new());
    let controller = ExportController::new(Arc::clone(&renderer), sink);

    let config = CardConfig {
        author_icon_url: format!("{}/red.png", base),
        ..Default::default()
    };
    let artifact = controller.export(config.clone()).await.unwrap();
    let px = icon_center_pixel(&renderer, &config, &artifact.bytes);
    assert!(px[0] > 200 && px[1] < 60 && px[2] < 60, "{:?}", px);
}

#[cfg(feature = "http")]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_icon_falls_back_to_default() {
    let base = start_icon_server();
    let renderer = http_renderer();
    let controller = ExportController::new(Arc::clone(&renderer), Arc::new(MemorySink::new()));

    for path in ["/missing.png", "/garbage.png"] {
        let config = CardConfig {
            author_icon_url: format!("{}{}", base, path),
            ..Default::default()
        };
        let artifact = controller.export(config.clone()).await.expect("export succeeds");
        assert_eq!((artifact.width, artifact.height), (1200, 630));

        // Same pixels as an explicit default icon
        let default_config = CardConfig::default();
        let default_shot = renderer.render(&default_config, 1.0).unwrap();
        assert_eq!(
            icon_center_pixel(&renderer, &config, &artifact.bytes),
            icon_center_pixel(&renderer, &default_config, &default_shot.png_data)
        );
    }
}

#[test]
fn malformed_icon_references_still_render() {
    let renderer = CardRenderer::from_parts(None, IconResolver::offline(), default_classifier(), Locale::En);
    for reference in ["data:image/png;base64,!!!", "ftp://example.com/a.png", "/no/such/icon.png"] {
        let config = CardConfig {
            author_icon_url: reference.into(),
            ..Default::default()
        };
        assert!(!matches!(IconSource::parse(reference), IconSource::Default));
        let shot = renderer.render(&config, 1.0).unwrap();
        assert_eq!((shot.width, shot.height), (1200, 630));
    }
}

#[tokio::test]
async fn directory_sink_writes_the_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("cards");
    let renderer = Arc::new(CardRenderer::from_parts(
        None,
        IconResolver::offline(),
        default_classifier(),
        Locale::En,
    ));
    let controller = ExportController::new(renderer, Arc::new(DirectorySink::new(&dir)));

    let artifact = controller.export(CardConfig::default()).await.unwrap();
    let written = std::fs::read(dir.join(&artifact.filename)).unwrap();
    assert_eq!(written, artifact.bytes);

    let names: Vec<String> = std::fs::read_dir(&dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![artifact.filename.clone()]);
}
