//! Conversion of meshes to visual toolkit formats
//!
//! A [CellMesh] maps directly onto a VTK unstructured grid. Every cell carries
//! its solver block id, shell index, fuel zone, and volume as cell data so the
//! regions can be checked visually before the mesh is used.
//!
//! ```rust, no_run
//! # use pbfhr::mesh::{CellMesh, MeshOptions, Region, Shell};
//! # use pbfhr::vtk::{write_vtk, CellMeshToVtkBuilder, VtkFormat};
//! # use vtkio::xml::Compressor;
//! # let shell = Shell {
//! #     region: Region::CentralReflector,
//! #     r_inner: 0.0,
//! #     r_outer: 0.5,
//! #     z_min: 0.0,
//! #     height: 4.0,
//! # };
//! let mesh = CellMesh::from_shells(&[shell], &MeshOptions::default()).unwrap();
//!
//! let convertor = CellMeshToVtkBuilder::new().build();
//! let vtk = convertor.convert(&mesh).unwrap();
//!
//! write_vtk(vtk, "column.vtu", VtkFormat::Xml, Compressor::LZMA).unwrap();
//! ```

// internal modules
use crate::mesh::{CellKind, CellMesh};
use crate::utils::*;

// standard library
use std::path::Path;

// external crates
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::debug;
use vtkio::model::{
    Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType, IOBuffer,
    UnstructuredGridPiece, Version, VertexNumbers, Vtk,
};
use vtkio::xml::Compressor;

/// Supported VTK output formats
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum VtkFormat {
    /// Modern XML unstructured grid (`.vtu`)
    Xml,
    /// Legacy ASCII (`.vtk`)
    LegacyAscii,
    /// Legacy big-endian binary (`.vtk`)
    LegacyBinary,
}

impl VtkFormat {
    /// File extension expected by VTK readers for this format
    ///
    /// ```rust
    /// # use pbfhr::vtk::VtkFormat;
    /// assert_eq!(VtkFormat::Xml.extension(), "vtu");
    /// assert_eq!(VtkFormat::LegacyAscii.extension(), "vtk");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "vtu",
            Self::LegacyAscii | Self::LegacyBinary => "vtk",
        }
    }
}

/// Builder for [CellMeshToVtk] convertors
#[derive(Debug, Default)]
pub struct CellMeshToVtkBuilder {
    byte_order: Option<ByteOrder>,
}

impl CellMeshToVtkBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Byte ordering of binary data, big endian by default for VisIt
    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }

    pub fn build(self) -> CellMeshToVtk {
        CellMeshToVtk {
            byte_order: self.byte_order.unwrap_or(ByteOrder::BigEndian),
        }
    }
}

/// Converts a [CellMesh] into a [Vtk] unstructured grid
#[derive(Debug)]
pub struct CellMeshToVtk {
    byte_order: ByteOrder,
}

impl CellMeshToVtk {
    pub fn convert(&self, mesh: &CellMesh) -> Result<Vtk> {
        debug!(
            "Building unstructured grid of {} cells",
            mesh.cells.len()
        );

        let points: Vec<f64> = mesh.points.iter().flatten().copied().collect();

        let num_cells = u32::try_from(mesh.cells.len())
            .with_context(|| f!("Too many cells for VTK: {}", mesh.cells.len()))?;

        let mut vertices: Vec<u32> = Vec::with_capacity(mesh.cells.len() * 9);
        for cell in &mesh.cells {
            vertices.push(u32::try_from(cell.vertices.len())?);
            for &v in &cell.vertices {
                vertices.push(
                    u32::try_from(v).with_context(|| f!("Point index {v} does not fit in u32"))?,
                );
            }
        }

        let types = mesh
            .cells
            .iter()
            .map(|cell| match cell.kind {
                CellKind::Hexahedron => CellType::Hexahedron,
                CellKind::Wedge => CellType::Wedge,
            })
            .collect::<Vec<CellType>>();

        Ok(Vtk {
            version: Version { major: 1, minor: 0 },
            title: String::from("pbfhr core mesh"),
            byte_order: self.byte_order,
            file_path: None,
            data: DataSet::inline(UnstructuredGridPiece {
                points: IOBuffer::F64(points),
                cells: Cells {
                    cell_verts: VertexNumbers::Legacy { num_cells, vertices },
                    types,
                },
                data: Attributes {
                    point: Vec::new(),
                    cell: Self::cell_data(mesh),
                },
            }),
        })
    }

    fn cell_data(mesh: &CellMesh) -> Vec<Attribute> {
        let block_id = mesh
            .cells
            .iter()
            .map(|c| mesh.region(c).block_id())
            .collect::<Vec<i32>>();
        let shell = mesh.cells.iter().map(|c| c.shell as i32).collect();
        let zone = mesh
            .cells
            .iter()
            .map(|c| mesh.region(c).zone() as i32)
            .collect();
        let volume = mesh.cells.iter().map(|c| c.volume).collect();

        vec![
            Self::scalars("block_id", IOBuffer::I32(block_id)),
            Self::scalars("shell", IOBuffer::I32(shell)),
            Self::scalars("zone", IOBuffer::I32(zone)),
            Self::scalars("volume", IOBuffer::F64(volume)),
        ]
    }

    fn scalars(name: &str, data: IOBuffer) -> Attribute {
        Attribute::DataArray(DataArray {
            name: name.to_string(),
            elem: ElementType::Scalars {
                num_comp: 1,
                lookup_table: None,
            },
            data,
        })
    }
}

/// Write a [Vtk] to file in the requested format
///
/// The `compressor` only applies to the XML format. Legacy binary output is
/// always written big endian.
pub fn write_vtk<P: AsRef<Path>>(
    vtk: Vtk,
    path: P,
    format: VtkFormat,
    compressor: Compressor,
) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {:?} format to {}", format, path.display());

    match format {
        VtkFormat::Xml => {
            let xml = vtk.try_into_xml_format(compressor, 9)?;
            xml.export(path)?;
        }
        VtkFormat::LegacyAscii => vtk.export_ascii(path)?,
        VtkFormat::LegacyBinary => vtk.export_be(path)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{MeshOptions, Region, Shell};
    use rstest::rstest;

    fn column() -> CellMesh {
        let shells = [
            Shell {
                region: Region::CentralReflector,
                r_inner: 0.0,
                r_outer: 0.5,
                z_min: 0.0,
                height: 1.0,
            },
            Shell {
                region: Region::FuelPebbles(2),
                r_inner: 0.5,
                r_outer: 1.0,
                z_min: 0.0,
                height: 1.0,
            },
        ];
        let options = MeshOptions {
            resolution: 4,
            max_dr: 1.0,
            max_dz: 1.0,
            ..Default::default()
        };
        CellMesh::from_shells(&shells, &options).unwrap()
    }

    #[test]
    fn unstructured_grid_layout() {
        let vtk = CellMeshToVtkBuilder::new().build().convert(&column()).unwrap();
        let piece = match vtk.data {
            DataSet::UnstructuredGrid { pieces, .. } => match pieces.into_iter().next() {
                Some(vtkio::model::Piece::Inline(piece)) => *piece,
                _ => panic!("expected an inline piece"),
            },
            _ => panic!("expected an unstructured grid"),
        };

        assert_eq!(piece.points.len(), 26 * 3);
        assert_eq!(piece.cells.types.len(), 8);
        assert_eq!(piece.cells.types[0], CellType::Wedge);
        assert_eq!(piece.cells.types[7], CellType::Hexahedron);
        assert_eq!(piece.data.cell.len(), 4);

        match &piece.cells.cell_verts {
            VertexNumbers::Legacy { num_cells, vertices } => {
                assert_eq!(*num_cells, 8);
                assert_eq!(vertices.len(), 4 * 7 + 4 * 9);
            }
            _ => panic!("expected legacy vertex numbers"),
        }
    }

    #[test]
    fn block_ids_in_cell_data() {
        let vtk = CellMeshToVtkBuilder::new().build().convert(&column()).unwrap();
        let DataSet::UnstructuredGrid { pieces, .. } = vtk.data else {
            panic!("expected an unstructured grid")
        };
        let Some(vtkio::model::Piece::Inline(piece)) = pieces.into_iter().next() else {
            panic!("expected an inline piece")
        };

        let Attribute::DataArray(block_id) = &piece.data.cell[0] else {
            panic!("expected a data array")
        };
        assert_eq!(block_id.name, "block_id");
        match &block_id.data {
            IOBuffer::I32(ids) => {
                assert_eq!(&ids[..4], &[3, 3, 3, 3]);
                assert_eq!(&ids[4..], &[1, 1, 1, 1]);
            }
            _ => panic!("expected i32 block ids"),
        }
    }

    #[test]
    fn legacy_ascii_written() {
        let path = TempPath::new("vtk_ascii.vtk");
        let vtk = CellMeshToVtkBuilder::new().build().convert(&column()).unwrap();
        write_vtk(vtk, &path, VtkFormat::LegacyAscii, Compressor::None).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("UNSTRUCTURED_GRID"));
        assert!(content.contains("block_id"));
    }

    #[rstest]
    #[case::xml_lzma(VtkFormat::Xml, Compressor::LZMA)]
    #[case::xml_zlib(VtkFormat::Xml, Compressor::ZLib)]
    #[case::xml_uncompressed(VtkFormat::Xml, Compressor::None)]
    #[case::legacy_ascii(VtkFormat::LegacyAscii, Compressor::None)]
    #[case::legacy_binary(VtkFormat::LegacyBinary, Compressor::None)]
    fn every_format_written(#[case] format: VtkFormat, #[case] compressor: Compressor) {
        let name = f!("vtk_{format:?}_{compressor:?}.{}", format.extension());
        let path = TempPath::new(&name);
        let vtk = CellMeshToVtkBuilder::new().build().convert(&column()).unwrap();
        write_vtk(vtk, &path, format, compressor).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
        match format {
            VtkFormat::Xml => assert!(contains(&bytes, b"<VTKFile")),
            _ => assert!(bytes.starts_with(b"# vtk")),
        }
        assert!(contains(&bytes, b"UnstructuredGrid") || contains(&bytes, b"UNSTRUCTURED_GRID"));
    }

    #[test]
    fn oversized_indices_rejected() {
        let mut mesh = column();
        mesh.cells[0].vertices[0] = u32::MAX as usize + 1;
        assert!(CellMeshToVtkBuilder::new().build().convert(&mesh).is_err());
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }
}
