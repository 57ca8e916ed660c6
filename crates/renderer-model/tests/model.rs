use std::sync::Arc;

use bytes::Bytes;
use glam::Mat4;
use renderer_model::{
    accessor::{ComponentType, ElementType},
    buffer::BufferSource,
    camera::CameraProjection,
    index::RecordKind,
    node::NodeTransform,
    raw::{
        RawAccessor, RawBuffer, RawBufferView, RawCamera, RawMaterial, RawMesh, RawNode,
        RawPrimitive, RawProjection, RawScene, RawSkin, RawSparse, RawSparseIndices,
        RawSparseValues,
    },
    resource::MemoryLoader,
    LoadParams, Model, ModelError, ModelResult, RawDocument,
};

fn u16_bytes(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

fn buffer(byte_length: usize) -> RawBuffer {
    RawBuffer {
        byte_length,
        ..Default::default()
    }
}

fn view(byte_offset: usize, byte_length: usize) -> RawBufferView {
    RawBufferView {
        buffer: 0,
        byte_offset,
        byte_length,
        ..Default::default()
    }
}

fn u16_accessor(view: Option<usize>, count: usize) -> RawAccessor {
    RawAccessor {
        buffer_view: view,
        ..RawAccessor::new(ComponentType::U16, ElementType::Scalar, count)
    }
}

fn sparse(count: usize, indices_view: usize, values_view: usize) -> RawSparse {
    RawSparse {
        count,
        indices: RawSparseIndices {
            buffer_view: indices_view,
            byte_offset: 0,
            component_type: ComponentType::U8,
        },
        values: RawSparseValues {
            buffer_view: values_view,
            byte_offset: 0,
        },
    }
}

fn perspective() -> RawCamera {
    RawCamera {
        name: None,
        projection: RawProjection::Perspective {
            aspect_ratio: None,
            yfov: 1.0,
            znear: 0.1,
            zfar: Some(100.0),
        },
    }
}

fn build_with(document: RawDocument, blob: Option<Vec<u8>>, params: &LoadParams) -> ModelResult<Model> {
    let mut loader = MemoryLoader::new();
    Model::build(document, blob.map(Bytes::from), &mut loader, params)
}

fn build(document: RawDocument, blob: Option<Vec<u8>>) -> ModelResult<Model> {
    build_with(document, blob, &LoadParams::default())
}

/// One mesh with two primitives drawn by a node of scene 0.
fn mesh_document() -> (RawDocument, Vec<u8>) {
    let data = u16_bytes(&[0, 1, 2, 3]);
    let primitive = RawPrimitive {
        indices: Some(0),
        attributes: vec![("POSITION".to_string(), 1)],
        material: Some(0),
        ..Default::default()
    };
    let document = RawDocument {
        buffers: vec![buffer(data.len())],
        buffer_views: vec![view(0, 8)],
        accessors: vec![
            u16_accessor(Some(0), 4),
            RawAccessor::new(ComponentType::F32, ElementType::Vec3, 4),
        ],
        materials: vec![RawMaterial {
            name: Some("paint".to_string()),
            ..Default::default()
        }],
        meshes: vec![RawMesh {
            primitives: vec![primitive.clone(), primitive],
            ..Default::default()
        }],
        nodes: vec![RawNode {
            mesh: Some(0),
            ..Default::default()
        }],
        scenes: vec![RawScene {
            name: None,
            nodes: vec![0],
        }],
        scene: Some(0),
        ..Default::default()
    };
    (document, data)
}

#[test]
fn references_resolve_to_same_position() {
    let (document, data) = mesh_document();
    let model = build(document, Some(data)).unwrap();

    let indices = &model.accessors()[0];
    assert!(Arc::ptr_eq(indices.view(), &model.buffer_views()[0]));
    assert!(Arc::ptr_eq(indices.view().buffer(), &model.buffers()[0]));
    let mesh = &model.meshes()[0];
    assert!(Arc::ptr_eq(model.nodes()[0].mesh().unwrap(), mesh));
    assert!(Arc::ptr_eq(&model.scenes()[0].nodes()[0], &model.nodes()[0]));
    for primitive in mesh.primitives() {
        assert!(Arc::ptr_eq(primitive.indices().unwrap(), indices));
        assert!(Arc::ptr_eq(
            primitive.attribute("POSITION").unwrap(),
            &model.accessors()[1]
        ));
    }
    assert_eq!(indices.read_indices().unwrap(), vec![0, 1, 2, 3]);
    assert_eq!(model.buffers()[0].source(), &BufferSource::Embedded);
    assert!(Arc::ptr_eq(model.default_scene().unwrap(), &model.scenes()[0]));
    assert_eq!(model.document().accessors.len(), 2);
}

#[test]
fn synthesized_accessor_owns_dense_view() {
    let (document, data) = mesh_document();
    let model = build(document, Some(data)).unwrap();

    let positions = &model.accessors()[1];
    let view = positions.view();
    assert_eq!(view.byte_length(), 4 * 12);
    assert_eq!(view.byte_offset(), 0);
    assert_eq!(view.byte_stride(), Some(12));
    assert_eq!(view.index(), None);
    assert_eq!(positions.byte_stride(), 12);
    assert_eq!(view.buffer().uri(), Some("buffer_for_accessor1.bin"));
    assert_eq!(positions.read_f32().unwrap(), vec![0.0; 12]);
}

#[test]
fn sparse_overrides_base_view() {
    // Base [10, 11, 12, 13], indices [2, 0], values [22, 20].
    let mut data = u16_bytes(&[10, 11, 12, 13]);
    data.extend([2u8, 0, 0, 0]);
    data.extend(u16_bytes(&[22, 20]));
    let document = RawDocument {
        buffers: vec![buffer(data.len())],
        buffer_views: vec![view(0, 8), view(8, 2), view(12, 4)],
        accessors: vec![RawAccessor {
            sparse: Some(sparse(2, 1, 2)),
            ..u16_accessor(Some(0), 4)
        }],
        ..Default::default()
    };
    let model = build(document, Some(data)).unwrap();

    let accessor = &model.accessors()[0];
    assert!(accessor.is_sparse());
    assert!(!Arc::ptr_eq(accessor.view(), &model.buffer_views()[0]));
    assert_eq!(accessor.byte_offset(), 0);
    assert_eq!(accessor.read_u16().unwrap(), vec![20, 11, 22, 13]);
    // The base view itself is untouched.
    assert_eq!(&model.buffer_views()[0].data()[..], &u16_bytes(&[10, 11, 12, 13])[..]);
}

fn zero_based_sparse_document() -> (RawDocument, Vec<u8>) {
    // No base view, count 4, override index 1 with 7.
    let mut data = vec![1u8, 0];
    data.extend(u16_bytes(&[7]));
    let document = RawDocument {
        buffers: vec![buffer(data.len())],
        buffer_views: vec![view(0, 1), view(2, 2)],
        accessors: vec![RawAccessor {
            sparse: Some(sparse(1, 0, 1)),
            ..u16_accessor(None, 4)
        }],
        ..Default::default()
    };
    (document, data)
}

#[test]
fn sparse_without_base_starts_from_zero() {
    let (document, data) = zero_based_sparse_document();
    let model = build(document, Some(data)).unwrap();

    let accessor = &model.accessors()[0];
    assert_eq!(accessor.read_u16().unwrap(), vec![0, 7, 0, 0]);
    // Repeated reads see the same memoised bytes.
    let first = accessor.view().data();
    let second = accessor.view().data();
    assert_eq!(first.as_ptr(), second.as_ptr());
}

#[test]
fn eager_and_lazy_sparse_agree() {
    let params = LoadParams {
        eager_sparse: true,
        ..Default::default()
    };
    let (document, data) = zero_based_sparse_document();
    let eager = build_with(document.clone(), Some(data.clone()), &params).unwrap();
    let lazy = build(document, Some(data)).unwrap();
    assert_eq!(
        eager.accessors()[0].read_bytes(),
        lazy.accessors()[0].read_bytes()
    );
}

#[test]
fn sparse_read_from_many_threads() {
    let (document, data) = zero_based_sparse_document();
    let model = Arc::new(build(document, Some(data)).unwrap());
    let handles = (0..4)
        .map(|_| {
            let model = model.clone();
            std::thread::spawn(move || model.accessors()[0].read_u16().unwrap())
        })
        .collect::<Vec<_>>();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![0, 7, 0, 0]);
    }
}

#[test]
fn duplicate_sparse_indices_later_wins() {
    let mut data = vec![1u8, 1, 0, 0];
    data.extend(u16_bytes(&[5, 6]));
    let document = RawDocument {
        buffers: vec![buffer(data.len())],
        buffer_views: vec![view(0, 2), view(4, 4)],
        accessors: vec![RawAccessor {
            sparse: Some(sparse(2, 0, 1)),
            ..u16_accessor(None, 2)
        }],
        ..Default::default()
    };
    let model = build(document, Some(data)).unwrap();
    assert_eq!(model.accessors()[0].read_u16().unwrap(), vec![0, 6]);
}

#[test]
fn sparse_index_out_of_range_fails() {
    let mut data = vec![4u8, 0];
    data.extend(u16_bytes(&[7]));
    let document = RawDocument {
        buffers: vec![buffer(data.len())],
        buffer_views: vec![view(0, 1), view(2, 2)],
        accessors: vec![RawAccessor {
            sparse: Some(sparse(1, 0, 1)),
            ..u16_accessor(None, 4)
        }],
        ..Default::default()
    };
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::SparseIndexOutOfRange {
            accessor: 0,
            index: 4,
            count: 4
        })
    ));
}

#[test]
fn sparse_indices_must_be_unsigned() {
    let (mut document, data) = zero_based_sparse_document();
    if let Some(sparse) = document.accessors[0].sparse.as_mut() {
        sparse.indices.component_type = ComponentType::F32;
    }
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::InvalidSparseIndexType {
            accessor: 0,
            component_type: ComponentType::F32
        })
    ));
}

#[test]
fn identical_materials_are_distinct_instances() {
    let (document, data) = mesh_document();
    let model = build(document, Some(data)).unwrap();

    let primitives = model.meshes()[0].primitives();
    let first = primitives[0].material().unwrap();
    let second = primitives[1].material().unwrap();
    assert!(!Arc::ptr_eq(first, second));
    assert_eq!(first, second);
    assert_eq!(first.definition_index(), Some(0));
    assert_eq!(first.name(), Some("paint"));
    assert_eq!(first.joint_count(), 0);

    assert_eq!(model.materials().len(), 2);
    assert!(Arc::ptr_eq(&model.materials()[0], first));
    assert!(Arc::ptr_eq(&model.materials()[1], second));
}

#[test]
fn unreachable_meshes_get_no_material() {
    let (mut document, data) = mesh_document();
    let unused = document.meshes[0].clone();
    document.meshes.push(unused.clone());
    document.meshes.push(unused);
    // Node 1 draws mesh 2 but no scene lists it.
    document.nodes.push(RawNode {
        mesh: Some(2),
        ..Default::default()
    });
    let model = build(document, Some(data)).unwrap();

    assert_eq!(model.materials().len(), 2);
    for mesh in &model.meshes()[1..] {
        for primitive in mesh.primitives() {
            assert!(primitive.material().is_none());
        }
    }
    for (primitive, material) in model.meshes()[0].primitives().iter().zip(model.materials()) {
        assert!(Arc::ptr_eq(primitive.material().unwrap(), material));
    }
}

#[test]
fn mesh_shared_by_nodes_is_instanced_once() {
    let (mut document, data) = mesh_document();
    document.nodes.push(RawNode {
        mesh: Some(0),
        ..Default::default()
    });
    document.scenes[0].nodes.push(1);
    document.scenes.push(RawScene {
        name: None,
        nodes: vec![1, 0],
    });
    let model = build(document, Some(data)).unwrap();
    assert_eq!(model.materials().len(), 2);
}

#[test]
fn materials_take_joint_count_from_skinned_node() {
    let (mut document, data) = mesh_document();
    document.nodes.push(RawNode::default());
    document.nodes.push(RawNode::default());
    document.nodes[0].skin = Some(0);
    document.nodes[0].children = vec![1, 2];
    document.skins.push(RawSkin {
        joints: vec![1, 2],
        skeleton: Some(1),
        ..Default::default()
    });
    let model = build(document, Some(data)).unwrap();

    assert_eq!(model.skins()[0].joint_count(), 2);
    assert!(Arc::ptr_eq(&model.skins()[0].joints()[1], &model.nodes()[2]));
    for material in model.materials() {
        assert_eq!(material.joint_count(), 2);
        assert!(material.is_skinned());
    }
}

#[test]
fn primitive_without_material_uses_default() {
    let (mut document, data) = mesh_document();
    document.meshes[0].primitives[1].material = None;
    let model = build(document, Some(data)).unwrap();

    let material = model.meshes()[0].primitives()[1].material().unwrap();
    assert_eq!(material.definition_index(), None);
    assert_eq!(material.definition().base_color_factor, [1.0; 4]);
    assert_eq!(material.definition().metallic_factor, 1.0);
}

fn camera_document() -> RawDocument {
    RawDocument {
        cameras: vec![perspective()],
        nodes: vec![
            RawNode {
                name: Some("rig".to_string()),
                children: vec![1, 2],
                translation: Some([0.0, 0.0, 10.0]),
                ..Default::default()
            },
            RawNode {
                name: Some("main".to_string()),
                camera: Some(0),
                ..Default::default()
            },
            RawNode {
                camera: Some(0),
                translation: Some([1.0, 0.0, 0.0]),
                ..Default::default()
            },
        ],
        scenes: vec![RawScene {
            name: None,
            nodes: vec![0],
        }],
        ..Default::default()
    }
}

#[test]
fn camera_instances_per_node() {
    let model = build(camera_document(), None).unwrap();

    let cameras = model.cameras();
    assert_eq!(cameras.len(), 2);
    assert_eq!(cameras[0].instance_name(), "main.camera0");
    assert_eq!(cameras[1].instance_name(), "node2.camera0");
    assert_eq!(cameras[0].camera_index(), cameras[1].camera_index());
    assert!(Arc::ptr_eq(&cameras[0].node().unwrap(), &model.nodes()[1]));
    assert_eq!(
        cameras[1].compute_projection_matrix(2.0),
        Mat4::perspective_rh(1.0, 2.0, 0.1, 100.0)
    );
    assert!(matches!(
        cameras[0].projection(),
        CameraProjection::Perspective { .. }
    ));
}

#[test]
fn view_matrix_follows_transform_changes() {
    let model = build(camera_document(), None).unwrap();
    let camera = &model.cameras()[0];

    let before = camera.compute_view_matrix().unwrap();
    assert_eq!(before.w_axis.z, -10.0);
    model.nodes()[0].set_transform(NodeTransform::from_parts(
        None,
        Some([0.0, 0.0, 20.0]),
        None,
        None,
    ));
    let after = camera.compute_view_matrix().unwrap();
    assert_ne!(before, after);
    assert_eq!(after.w_axis.z, -20.0);
}

#[test]
fn camera_does_not_keep_model_alive() {
    let model = build(camera_document(), None).unwrap();
    let camera = model.cameras()[0].clone();
    drop(model);
    assert!(camera.compute_view_matrix().is_none());
    assert!(camera.node().is_none());
}

#[test]
fn unreachable_camera_node_is_its_own_root() {
    let mut document = camera_document();
    document.scenes.clear();
    let model = build(document, None).unwrap();
    // Bound to node 2 alone, without the rig translation.
    let view = model.cameras()[1].compute_view_matrix().unwrap();
    assert_eq!(view.w_axis.x, -1.0);
    assert_eq!(view.w_axis.z, 0.0);
}

#[test]
fn shared_child_is_one_object() {
    let document = RawDocument {
        nodes: vec![
            RawNode {
                children: vec![1, 2],
                ..Default::default()
            },
            RawNode {
                children: vec![2],
                ..Default::default()
            },
            RawNode::default(),
        ],
        scenes: vec![RawScene {
            name: None,
            nodes: vec![0],
        }],
        ..Default::default()
    };
    let model = build(document, None).unwrap();

    let nodes = model.nodes();
    assert!(Arc::ptr_eq(&nodes[0].children()[1], &nodes[2]));
    assert!(Arc::ptr_eq(&nodes[1].children()[0], &nodes[2]));
    let paths = model.paths_to(2);
    assert_eq!(paths.len(), 2);
    for path in &paths {
        assert!(Arc::ptr_eq(path.last().unwrap(), &nodes[2]));
    }
}

/// Scene 0 holds a ladder of `levels` diamonds, `2k -> [2k + 1, 2k + 2]`
/// and `2k + 1 -> [2k + 2]`. The node after the ladder has a camera and
/// belongs to no scene.
fn diamond_ladder_document(levels: usize) -> RawDocument {
    let mut nodes = (0..levels)
        .flat_map(|level| {
            let top = 2 * level;
            [
                RawNode {
                    children: vec![top + 1, top + 2],
                    ..Default::default()
                },
                RawNode {
                    children: vec![top + 2],
                    ..Default::default()
                },
            ]
        })
        .collect::<Vec<_>>();
    nodes.push(RawNode::default());
    nodes.push(RawNode {
        camera: Some(0),
        translation: Some([0.0, 3.0, 0.0]),
        ..Default::default()
    });
    RawDocument {
        cameras: vec![perspective()],
        nodes,
        scenes: vec![RawScene {
            name: None,
            nodes: vec![0],
        }],
        ..Default::default()
    }
}

#[test]
fn camera_outside_diamond_ladder_binds_to_itself() {
    let model = build(diamond_ladder_document(64), None).unwrap();

    let camera = &model.cameras()[0];
    assert!(Arc::ptr_eq(&camera.node().unwrap(), &model.nodes()[129]));
    assert_eq!(camera.compute_view_matrix().unwrap().w_axis.y, -3.0);
    assert!(model.paths_to(129).is_empty());
    assert_eq!(model.paths_to(3).len(), 2);
}

#[test]
fn deep_child_chain() {
    let depth = 100_000;
    let mut nodes = (0..depth)
        .map(|index| RawNode {
            children: vec![index + 1],
            ..Default::default()
        })
        .collect::<Vec<_>>();
    nodes.push(RawNode {
        camera: Some(0),
        ..Default::default()
    });
    let document = RawDocument {
        cameras: vec![perspective()],
        nodes,
        scenes: vec![RawScene {
            name: None,
            nodes: vec![0],
        }],
        ..Default::default()
    };
    let model = build(document, None).unwrap();

    assert_eq!(model.nodes().len(), depth + 1);
    let paths = model.paths_to(depth);
    assert_eq!(paths.len(), 1);
    assert_eq!(paths[0].nodes().len(), depth + 1);
    assert_eq!(model.cameras()[0].compute_view_matrix(), Some(Mat4::IDENTITY));
}

#[test]
fn cyclic_children_are_rejected() {
    let document = RawDocument {
        nodes: vec![
            RawNode {
                children: vec![1],
                ..Default::default()
            },
            RawNode {
                children: vec![0],
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    assert!(matches!(
        build(document, None),
        Err(ModelError::CyclicNodeGraph { .. })
    ));
}

#[test]
fn out_of_range_view_is_malformed() {
    let (mut document, data) = mesh_document();
    document.accessors[0].buffer_view = Some(1);
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::MalformedReference {
            kind: RecordKind::BufferView,
            index: 1,
            len: 1
        })
    ));
}

#[test]
fn out_of_range_node_mesh_and_camera_are_malformed() {
    let (mut document, data) = mesh_document();
    document.nodes[0].mesh = Some(3);
    assert!(matches!(
        build(document, Some(data.clone())),
        Err(ModelError::MalformedReference {
            kind: RecordKind::Mesh,
            ..
        })
    ));

    let (mut document, _) = mesh_document();
    document.nodes[0].camera = Some(0);
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::MalformedReference {
            kind: RecordKind::Camera,
            index: 0,
            len: 0
        })
    ));
}

#[test]
fn accessor_past_view_end_is_rejected() {
    let (mut document, data) = mesh_document();
    document.accessors[0].count = 5;
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::ByteRangeOutOfBounds { .. })
    ));
}

#[test]
fn view_past_buffer_end_is_rejected() {
    let (mut document, data) = mesh_document();
    document.buffer_views[0].byte_offset = 4;
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::ByteRangeOutOfBounds { .. })
    ));
}

#[test]
fn huge_accessor_count_is_out_of_bounds() {
    let (mut document, data) = mesh_document();
    document.accessors[0] = RawAccessor {
        buffer_view: Some(0),
        ..RawAccessor::new(ComponentType::F32, ElementType::Scalar, usize::MAX / 2)
    };
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::ByteRangeOutOfBounds { .. })
    ));
}

#[test]
fn huge_synthesized_accessor_is_out_of_bounds() {
    let (mut document, data) = mesh_document();
    document.accessors[1] = RawAccessor::new(ComponentType::F32, ElementType::Mat4, usize::MAX / 8);
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::ByteRangeOutOfBounds { .. })
    ));
}

#[test]
fn huge_sparse_count_is_out_of_bounds() {
    let (mut document, data) = zero_based_sparse_document();
    if let Some(sparse) = document.accessors[0].sparse.as_mut() {
        sparse.count = usize::MAX / 2;
        sparse.indices.component_type = ComponentType::U32;
    }
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::ByteRangeOutOfBounds { .. })
    ));
}

#[test]
fn huge_sparse_accessor_is_out_of_bounds() {
    let (mut document, data) = zero_based_sparse_document();
    document.accessors[0].count = isize::MAX as usize;
    assert!(matches!(
        build(document, Some(data)),
        Err(ModelError::ByteRangeOutOfBounds { .. })
    ));
}

#[test]
fn interleaved_reads_respect_stride() {
    // Two VEC2<u16> attributes interleaved in 8-byte vertices.
    let data = u16_bytes(&[1, 2, 10, 20, 3, 4, 30, 40]);
    let mut second = RawAccessor::new(ComponentType::U16, ElementType::Vec2, 2);
    second.buffer_view = Some(0);
    second.byte_offset = 4;
    let mut first = second.clone();
    first.byte_offset = 0;
    let document = RawDocument {
        buffers: vec![buffer(data.len())],
        buffer_views: vec![RawBufferView {
            byte_stride: Some(8),
            ..view(0, 16)
        }],
        accessors: vec![first, second],
        ..Default::default()
    };
    let model = build(document, Some(data)).unwrap();
    assert_eq!(model.accessors()[0].read_u16().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(model.accessors()[1].read_u16().unwrap(), vec![10, 20, 30, 40]);
    assert_eq!(model.accessors()[1].byte_stride(), 8);
}

#[test]
fn data_uri_buffer() {
    let document = RawDocument {
        buffers: vec![RawBuffer {
            uri: Some("data:application/octet-stream;base64,AQACAA==".to_string()),
            byte_length: 4,
            name: None,
        }],
        buffer_views: vec![view(0, 4)],
        accessors: vec![u16_accessor(Some(0), 2)],
        ..Default::default()
    };
    let model = build(document, None).unwrap();
    assert_eq!(model.buffers()[0].source(), &BufferSource::DataUri);
    assert_eq!(model.accessors()[0].read_u16().unwrap(), vec![1, 2]);
}

#[test]
fn external_buffer_through_loader() {
    let document = RawDocument {
        buffers: vec![RawBuffer {
            uri: Some("mesh.bin".to_string()),
            byte_length: 4,
            name: None,
        }],
        ..Default::default()
    };
    let mut loader = MemoryLoader::new().with("mesh.bin", u16_bytes(&[5, 6, 0, 0]));
    let model = Model::build(document, None, &mut loader, &LoadParams::default()).unwrap();
    let buffer = &model.buffers()[0];
    assert_eq!(buffer.uri(), Some("mesh.bin"));
    // Longer data is cut to the declared length.
    assert_eq!(buffer.byte_length(), 4);
}

#[test]
fn unresolved_uri_is_missing_data() {
    let document = RawDocument {
        buffers: vec![RawBuffer {
            uri: Some("missing.bin".to_string()),
            byte_length: 4,
            name: None,
        }],
        ..Default::default()
    };
    assert!(matches!(
        build(document, None),
        Err(ModelError::MissingData { .. })
    ));
}

#[test]
fn buffer_without_source_is_missing_data() {
    let document = RawDocument {
        buffers: vec![buffer(4)],
        ..Default::default()
    };
    assert!(matches!(
        build(document, None),
        Err(ModelError::MissingData { .. })
    ));
}

#[test]
fn short_blob_is_missing_data() {
    let document = RawDocument {
        buffers: vec![buffer(16)],
        ..Default::default()
    };
    assert!(matches!(
        build(document, Some(vec![0; 8])),
        Err(ModelError::MissingData { .. })
    ));
}

#[test]
fn unsupported_scheme_is_resource_error() {
    let document = RawDocument {
        buffers: vec![RawBuffer {
            uri: Some("https://example.com/mesh.bin".to_string()),
            byte_length: 4,
            name: None,
        }],
        ..Default::default()
    };
    assert!(matches!(
        build(document, None),
        Err(ModelError::Resource { .. })
    ));
}

#[test]
fn blob_without_buffers_is_not_an_error() {
    let model = build(RawDocument::default(), Some(vec![1, 2, 3, 4])).unwrap();
    assert!(model.buffers().is_empty());
    assert!(model.default_scene().is_none());
}

#[test]
fn model_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Model>();
}
