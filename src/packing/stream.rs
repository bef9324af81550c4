pub(crate) enum BitStream<T> {
    ZeroSized(FixedValueIterator<u32>),
    NonZeroSized(NBitwiseIterator<T>),
}

impl<T> BitStream<T> {
    pub(crate) fn new(data: T, unit_size: usize, length: usize) -> Self {
        if unit_size == 0 {
            let iter = FixedValueIterator::new(0, length);
            Self::ZeroSized(iter)
        } else {
            let iter = NBitwiseIterator::new(data, unit_size);
            Self::NonZeroSized(iter)
        }
    }
}

impl<T> Iterator for BitStream<T>
where
    T: AsRef<[u8]>,
{
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::ZeroSized(z) => z.next(),
            Self::NonZeroSized(n) => n.next(),
        }
    }
}

pub(crate) struct FixedValueIterator<T> {
    val: T,
    length: usize,
    pos: usize,
}

impl<T> FixedValueIterator<T> {
    pub(crate) fn new(val: T, length: usize) -> Self {
        Self {
            val,
            length,
            pos: 0,
        }
    }
}

impl<T> Iterator for FixedValueIterator<T>
where
    T: Copy,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos < self.length {
            self.pos += 1;
            Some(self.val)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.length - self.pos;
        (size, Some(size))
    }
}

/// Reads unsigned integers of `size` bits (at most 32) packed contiguously
/// with the most significant bit first.
#[derive(Clone)]
pub(crate) struct NBitwiseIterator<T> {
    data: T,
    size: usize,
    pos: usize,
    offset: usize,
}

impl<T> NBitwiseIterator<T> {
    pub(crate) fn new(data: T, size: usize) -> Self {
        Self {
            data,
            size,
            pos: 0,
            offset: 0,
        }
    }

    pub(crate) fn with_offset(self, offset_bits: usize) -> Self {
        Self {
            offset: offset_bits,
            ..self
        }
    }
}

impl<T> Iterator for NBitwiseIterator<T>
where
    T: AsRef<[u8]>,
{
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        let new_offset = self.offset + self.size;
        let (new_pos, new_offset) = (self.pos + new_offset / 8, new_offset % 8);
        let slice = self.data.as_ref();

        if self.size == 0
            || self.pos >= slice.len()
            || new_pos > slice.len()
            || (new_pos == slice.len() && new_offset > 0)
        {
            return None;
        }

        let val = slice[self.pos] << self.offset >> self.offset;
        let mut val: u32 = u32::from(val);
        if new_pos == self.pos {
            val >>= 8 - new_offset;
        } else {
            let mut pos = self.pos + 1;
            while pos < new_pos {
                val = (val << 8) | u32::from(slice[pos]);
                pos += 1;
            }
            if new_offset > 0 {
                let shift = 8 - new_offset;
                let last_val = u32::from(slice[pos]) >> shift;
                val = (val << new_offset) | last_val;
            }
        }

        self.pos = new_pos;
        self.offset = new_offset;
        Some(val)
    }
}

/// Packs unsigned integers of up to 32 bits contiguously, most significant
/// bit first; the inverse of [`NBitwiseIterator`].
#[derive(Default)]
pub(crate) struct NBitwiseWriter {
    buf: Vec<u8>,
    pending: u64,
    num_pending_bits: usize,
}

impl NBitwiseWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends the lowest `size` bits of `value`.
    pub(crate) fn write(&mut self, value: u32, size: usize) {
        if size == 0 {
            return;
        }
        let mask = (1_u64 << size) - 1;
        self.pending = (self.pending << size) | (u64::from(value) & mask);
        self.num_pending_bits += size;
        while self.num_pending_bits >= 8 {
            self.num_pending_bits -= 8;
            self.buf.push((self.pending >> self.num_pending_bits) as u8);
        }
        self.pending &= (1_u64 << self.num_pending_bits) - 1;
    }

    pub(crate) fn write_all<I: IntoIterator<Item = u32>>(&mut self, values: I, size: usize) {
        for value in values {
            self.write(value, size);
        }
    }

    /// Fills the remaining bits of the current octet with zeros.
    pub(crate) fn pad_to_octet(&mut self) {
        if self.num_pending_bits > 0 {
            let shift = 8 - self.num_pending_bits;
            self.buf.push((self.pending << shift) as u8);
            self.pending = 0;
            self.num_pending_bits = 0;
        }
    }

    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.pad_to_octet();
        self.buf.extend_from_slice(bytes);
    }

    pub(crate) fn into_bytes(mut self) -> Vec<u8> {
        self.pad_to_octet();
        self.buf
    }
}
