use std::{
    io::{BufReader, Cursor},
    path::Path,
};

use anyhow::ensure;

use crate::{data_structures::mesh::MeshData, resources::load_string};

/// Loads every object of an OBJ file into one left-handed mesh.
///
/// Materials referenced by the file are read if present but otherwise
/// ignored: surfaces are described by [`Material`](crate::data_structures::material::Material).
pub async fn load_mesh_obj(asset_dir: &Path, file_name: &str) -> anyhow::Result<MeshData> {
    let obj_text = load_string(asset_dir, file_name).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            match load_string(asset_dir, &p).await {
                Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                Err(_) => Err(tobj::LoadError::OpenFileFailed),
            }
        },
    )
    .await?;
    if let Err(e) = obj_materials {
        log::debug!("No usable material library for {file_name}: {e}");
    }

    let mut data = MeshData::default();
    for model in &models {
        data.append(MeshData::from_obj_model(model));
    }
    ensure!(!data.indices.is_empty(), "{file_name} contains no faces");
    log::info!(
        "Loaded {file_name}: {} objects, {} vertices, {} triangles",
        models.len(),
        data.vertices.len(),
        data.triangle_count()
    );
    Ok(data)
}
