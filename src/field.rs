//! Pairing of a grid definition with a data representation to decode or
//! encode the values of one field.

use log::debug;

use crate::{
    error::GribError,
    grid::Projection,
    packing::PackingOptions,
    sections::{DataRepresentationSection, GridDefinitionSection},
};

/// A grid definition section and a data representation section describing
/// the same field.
#[derive(Debug, Clone, Copy)]
pub struct FieldCodec<'a> {
    gds: &'a GridDefinitionSection,
    drs: &'a DataRepresentationSection,
    has_bitmap: bool,
}

impl<'a> FieldCodec<'a> {
    /// Pairs the sections of a field without a bit map, in which case every
    /// grid point has a value.
    pub fn new(
        gds: &'a GridDefinitionSection,
        drs: &'a DataRepresentationSection,
    ) -> Result<Self, GribError> {
        if drs.num_encoded_points != gds.num_points {
            return Err(GribError::InvalidValue(format!(
                "{} values are encoded for a grid of {} points without a bit map",
                drs.num_encoded_points, gds.num_points
            )));
        }
        Ok(Self {
            gds,
            drs,
            has_bitmap: false,
        })
    }

    /// Pairs the sections of a field whose values are masked by a bit map.
    pub fn with_bitmap(
        gds: &'a GridDefinitionSection,
        drs: &'a DataRepresentationSection,
    ) -> Result<Self, GribError> {
        if drs.num_encoded_points > gds.num_points {
            return Err(GribError::InvalidValue(format!(
                "{} values are encoded for a grid of {} points",
                drs.num_encoded_points, gds.num_points
            )));
        }
        Ok(Self {
            gds,
            drs,
            has_bitmap: true,
        })
    }

    pub fn grid_definition(&self) -> &GridDefinitionSection {
        self.gds
    }

    pub fn data_representation(&self) -> &DataRepresentationSection {
        self.drs
    }

    /// Number of values stored in the data section.
    pub fn num_values(&self) -> usize {
        self.drs.num_encoded_points as usize
    }

    /// Decodes a data section payload into values in storage order.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        let values = self.drs.decode(payload)?;
        debug!(
            "decoded {} values on grid template 3.{}",
            values.len(),
            self.gds.template_num()
        );
        Ok(values)
    }

    /// Decodes a data section payload and rearranges the values so that the
    /// value of grid point `(i, j)` is at index `j * width + i`.
    ///
    /// Only fields of regular grids without a bit map can be rearranged.
    pub fn decode_grid(&self, payload: &[u8]) -> Result<Vec<f32>, GribError> {
        if self.has_bitmap {
            return Err(GribError::NotSupported(
                "rearranging values masked by a bit map".to_owned(),
            ));
        }
        let ij = self.gds.projection.ij()?;
        let (width, height) = self.gds.projection.grid_shape();
        let (width, height) = (width as usize, height as usize);
        if width * height != self.num_values() {
            return Err(GribError::InvalidValue(format!(
                "grid of {width}x{height} points does not hold {} values",
                self.num_values()
            )));
        }

        let values = self.decode(payload)?;
        let mut grid = vec![f32::NAN; values.len()];
        for ((i, j), value) in ij.zip(values) {
            grid[j * width + i] = value;
        }
        Ok(grid)
    }
}

/// Packs the values of every point of the grid described by `gds`, in
/// storage order, returning the data representation section and the data
/// section payload.
pub fn encode_field(
    gds: &GridDefinitionSection,
    template_num: u16,
    values: &[f32],
    options: &PackingOptions,
) -> Result<(DataRepresentationSection, Vec<u8>), GribError> {
    if values.len() != gds.num_points as usize {
        return Err(GribError::InvalidValue(format!(
            "{} values given for a grid of {} points",
            values.len(),
            gds.num_points
        )));
    }
    DataRepresentationSection::encode(template_num, values, options)
}
