mod drive_dto;

pub use drive_dto::{
    AssetUploadResponseDto, DriveFolderDto, DriveTokenResponseDto, UploadAssetDto, MAX_ASSET_SIZE,
};
