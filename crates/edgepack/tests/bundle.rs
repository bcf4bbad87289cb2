//! Bundling with rolldown, from project directories without `node_modules`.

use std::fs;
use std::path::{Path, PathBuf};

use edgepack::config::OutputConfig;
use edgepack::{
    Adapter, AdapterConfig, BundleRequest, RolldownBundler, RoutesConfig, StagedBuild,
    WorkerBundler,
};
use tempfile::TempDir;

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().unwrap().is_file())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

const WASM: &[u8] = b"\0asm\x01\0\0\0";

const SERVER_ENTRY: &str = r#"import { connect } from "cloudflare:sockets";
import { AsyncLocalStorage } from "node:async_hooks";
import codec from "./codec.wasm";

const store = new AsyncLocalStorage();

export default {
	async fetch() {
		const body = Buffer.from("ok").toString("base64");
		return new Response([body, typeof connect, typeof codec, typeof store].join(","));
	}
};
"#;

#[tokio::test]
async fn bundles_a_single_module_with_runtime_imports() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    write(&src.join("index.js"), SERVER_ENTRY);
    fs::write(src.join("codec.wasm"), WASM).unwrap();
    let out = temp.path().join("out");

    let request = BundleRequest::edge_worker(src.join("index.js"), out.join("_worker.js"))
        .cwd(temp.path());
    let summary = RolldownBundler::new().bundle(&request).await.unwrap();

    assert_eq!(summary.outfile, out.join("_worker.js"));
    assert_eq!(summary.sourcemap, Some(out.join("_worker.js.map")));
    assert_eq!(summary.copied, vec![out.join("codec.wasm")]);
    assert_eq!(file_names(&out), vec!["_worker.js", "_worker.js.map", "codec.wasm"]);

    let code = fs::read_to_string(out.join("_worker.js")).unwrap();
    assert!(code.contains("\"cloudflare:sockets\""));
    assert!(code.contains("\"node:async_hooks\""));
    assert!(code.contains("\"./codec.wasm\""));
    assert!(code.contains("//# sourceMappingURL=_worker.js.map"));
    assert_eq!(fs::read(out.join("codec.wasm")).unwrap(), WASM);

    // the Buffer polyfill is inlined, not imported from npm
    assert!(code.contains("globalThis.Buffer"));
    assert!(code.contains("extends Uint8Array"));
    assert!(!code.contains("from \"buffer\""));

    let map: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("_worker.js.map")).unwrap()).unwrap();
    assert_eq!(map["version"], 3);
}

fn staged_build(root: &Path) -> PathBuf {
    let build = root.join("build");
    write(
        &build.join("edgepack.build.json"),
        r#"{ "appDir": "_app", "prerendered": { "paths": ["/"] } }"#,
    );
    write(&build.join("client/_app/immutable/start.js"), "start");
    write(&build.join("client/robots.txt"), "User-agent: *");
    write(&build.join("prerendered/index.html"), "<h1>home</h1>");
    write(
        &build.join("server/index.js"),
        "export class Server {\n\
         \tconstructor(manifest) { this.manifest = manifest; }\n\
         \tasync init() {}\n\
         \tasync respond() { return new Response(\"rendered\"); }\n\
         }\n",
    );
    write(&build.join("server/nodes/0.js"), "export const component = \"layout-node\";\n");
    write(
        &build.join("manifest.js"),
        "{ appPath: \"_app\", assets: new Set([\"robots.txt\"]), \
         nodes: [() => import('__RELATIVE_PATH__/nodes/0.js')] }",
    );
    build
}

#[tokio::test]
async fn adapt_bundles_the_worker_into_one_file() {
    let temp = TempDir::new().unwrap();
    let build = StagedBuild::open(staged_build(temp.path())).unwrap();
    let config = AdapterConfig {
        routes: RoutesConfig::default(),
        output: OutputConfig {
            dir: temp.path().join("out"),
            scratch: temp.path().join("tmp"),
        },
    };
    let adapter = Adapter::new(config, RolldownBundler::new()).with_root(temp.path());

    let report = adapter.adapt(&build).await.unwrap();
    let out = temp.path().join("out");

    assert_eq!(report.worker.outfile, out.join("_worker.js"));
    assert_eq!(report.worker.sourcemap, Some(out.join("_worker.js.map")));

    let scripts: Vec<String> = file_names(&out)
        .into_iter()
        .filter(|name| name.ends_with(".js"))
        .collect();
    assert_eq!(scripts, vec!["_worker.js"]);

    let code = fs::read_to_string(out.join("_worker.js")).unwrap();
    assert!(code.contains("layout-node"));
    assert!(code.contains("rendered"));
    assert!(!code.contains("'SERVER'"));
    assert!(!code.contains("'MANIFEST'"));
}
