//! Page-boundary chunking
//!
//! A serial EEPROM latches at most one page per write transaction. Bytes
//! that run past the end of the page wrap around to the start of the
//! *same* page and overwrite it, so every write must be split at page
//! boundaries.

/// Length of the next chunk starting at `address`
///
/// The lesser of `remaining` and the room left in the page containing
/// `address`. A `page_size` of zero means the device is not paged.
pub const fn chunk_len(address: u32, remaining: usize, page_size: u16) -> usize {
    if page_size == 0 {
        return remaining;
    }

    let page = page_size as usize;
    let room = page - (address as usize % page);
    if remaining < room {
        remaining
    } else {
        room
    }
}

/// One page-bounded piece of a linear write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Chunk {
    /// Device address of the first byte
    pub address: u32,
    /// Offset of the first byte within the request
    pub offset: usize,
    /// Bytes in this chunk
    pub len: usize,
}

/// Iterator over the page-bounded chunks of `[address, address + len)`
#[derive(Debug, Clone)]
pub struct PageChunks {
    address: u32,
    offset: usize,
    remaining: usize,
    page_size: u16,
}

/// Split `[address, address + len)` at page boundaries
pub fn page_chunks(address: u32, len: usize, page_size: u16) -> PageChunks {
    PageChunks {
        address,
        offset: 0,
        remaining: len,
        page_size,
    }
}

impl Iterator for PageChunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.remaining == 0 {
            return None;
        }

        let len = chunk_len(self.address, self.remaining, self.page_size);
        let chunk = Chunk {
            address: self.address,
            offset: self.offset,
            len,
        };

        self.address += len as u32;
        self.offset += len;
        self.remaining -= len;

        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_fits_in_page() {
        assert_eq!(chunk_len(5, 10, 64), 10);
        assert_eq!(chunk_len(0, 64, 64), 64);
    }

    #[test]
    fn test_chunk_stops_at_page_boundary() {
        // offset 5 in a 64-byte page leaves 59 bytes of room
        assert_eq!(chunk_len(5, 70, 64), 59);
        assert_eq!(chunk_len(64, 70, 64), 64);
        assert_eq!(chunk_len(127, 2, 64), 1);
    }

    #[test]
    fn test_unpaged_device() {
        assert_eq!(chunk_len(5, 1000, 0), 1000);
    }

    #[test]
    fn test_page_chunks_split() {
        let mut chunks = page_chunks(5, 70, 64);
        assert_eq!(
            chunks.next(),
            Some(Chunk {
                address: 5,
                offset: 0,
                len: 59
            })
        );
        assert_eq!(
            chunks.next(),
            Some(Chunk {
                address: 64,
                offset: 59,
                len: 11
            })
        );
        assert_eq!(chunks.next(), None);
    }

    #[test]
    fn test_page_chunks_empty() {
        assert_eq!(page_chunks(100, 0, 64).next(), None);
    }

    #[test]
    fn test_page_chunks_cover_range_exactly() {
        let mut covered = 0;
        let mut expected_addr = 6;
        for chunk in page_chunks(6, 1000, 64) {
            assert_eq!(chunk.address, expected_addr);
            assert_eq!(chunk.offset, covered);
            assert!(chunk.len <= 64);
            // never straddles a page
            assert_eq!(chunk.address / 64, (chunk.address + chunk.len as u32 - 1) / 64);
            covered += chunk.len;
            expected_addr += chunk.len as u32;
        }
        assert_eq!(covered, 1000);
    }
}
