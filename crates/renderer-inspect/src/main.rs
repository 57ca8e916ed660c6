use std::{
    env,
    error::Error,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use log::{error, info};
use renderer_model::{
    archive::{tar::TarArchive, Archive},
    loader::gltf::{load_gltf_from_archive, load_gltf_from_slice},
    node::Node,
    resource::DirectoryLoader,
    LoadParams, Model,
};
use zip::ZipArchive;

const USAGE: &str = "Usage: renderer-inspect <model.gltf|model.glb|bundle.zip|bundle.tar> [--eager-sparse] [--name <model>]";

struct Args {
    path: PathBuf,
    params: LoadParams,
}

fn parse_args() -> Result<Args, String> {
    let mut path = None;
    let mut params = LoadParams::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--eager-sparse" => params.eager_sparse = true,
            "--name" => {
                params.model_name = args
                    .next()
                    .ok_or_else(|| String::from("--name needs a value"))?;
            }
            _ if arg.starts_with("--") => return Err(format!("Unknown option {}", arg)),
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return Err(format!("Unexpected argument {}", arg)),
        }
    }
    let path = path.ok_or_else(|| String::from(USAGE))?;
    Ok(Args { path, params })
}

fn load(path: &Path, params: &LoadParams) -> Result<Model, Box<dyn Error>> {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    let model = match extension.as_deref() {
        Some("zip") => {
            let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
            load_gltf_from_archive(&mut archive, params)?
        }
        Some("tar") => {
            let mut archive = TarArchive::new(BufReader::new(File::open(path)?))?;
            load_gltf_from_archive(&mut archive, params)?
        }
        Some("gltf") | Some("glb") => {
            let data = fs::read(path)?;
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let mut loader = DirectoryLoader::new(base);
            load_gltf_from_slice(&data, &mut loader, params)?
        }
        _ => return Err(format!("Unknown file type: {}", path.display()).into()),
    };
    Ok(model)
}

fn print_tree(root: &Arc<Node>) {
    let mut pending = vec![(root, 1)];
    while let Some((node, depth)) = pending.pop() {
        let mut line = format!(
            "{:indent$}- #{} {}",
            "",
            node.index(),
            node.name().unwrap_or("<unnamed>"),
            indent = depth * 2
        );
        if let Some(mesh) = node.mesh() {
            line.push_str(&format!(" mesh=#{}", mesh.index()));
        }
        if let Some(camera) = node.camera() {
            line.push_str(&format!(" camera=#{}", camera));
        }
        if let Some(skin) = node.skin() {
            line.push_str(&format!(" skin=#{}", skin));
        }
        println!("{}", line);
        pending.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
}

fn print_summary(model: &Model) {
    println!(
        "{} buffers, {} buffer views, {} accessors, {} images, {} textures",
        model.buffers().len(),
        model.buffer_views().len(),
        model.accessors().len(),
        model.images().len(),
        model.textures().len()
    );
    println!(
        "{} meshes, {} nodes, {} skins, {} scenes",
        model.meshes().len(),
        model.nodes().len(),
        model.skins().len(),
        model.scenes().len()
    );

    let default_scene = model.default_scene().map(|scene| scene.index());
    for scene in model.scenes() {
        let marker = if Some(scene.index()) == default_scene {
            " (default)"
        } else {
            ""
        };
        println!(
            "Scene #{} {}{}",
            scene.index(),
            scene.name().unwrap_or("<unnamed>"),
            marker
        );
        for node in scene.nodes() {
            print_tree(node);
        }
    }

    println!("Cameras:");
    for camera in model.cameras() {
        println!("  {} {:?}", camera.instance_name(), camera.projection());
    }

    println!("Materials:");
    for mesh in model.meshes() {
        for (index, primitive) in mesh.primitives().iter().enumerate() {
            let Some(material) = primitive.material() else {
                continue;
            };
            println!(
                "  mesh #{} primitive {}: {} ({:?}, {} joints)",
                mesh.index(),
                index,
                material.name().unwrap_or("<default>"),
                material.definition().alpha_mode,
                material.joint_count()
            );
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match load(&args.path, &args.params) {
        Ok(model) => {
            info!("Loaded {}", args.path.display());
            print_summary(&model);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Load GLTF failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
